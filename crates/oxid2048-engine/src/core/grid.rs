use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InvalidGridError;

use super::{
    direction::{Axis, Direction},
    line::merge_line,
};

/// Side length of the grid.
pub const GRID_SIZE: usize = 4;

/// Number of cells in the grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Highest tile exponent front-ends keep a style for (`2^17 = 131072`).
pub const MAX_TILE_EXPONENT: u32 = 17;

/// Largest tile exponent a cell can hold.
pub const MAX_CELL_EXPONENT: u32 = u32::BITS - 1;

/// Largest tile value a cell can hold (`2^31`). Two such tiles never merge.
pub const MAX_CELL_VALUE: u32 = 1 << MAX_CELL_EXPONENT;

/// Returns `true` if `value` may appear in a cell: `0` or `2^k` with
/// `1 <= k <= MAX_CELL_EXPONENT`.
#[must_use]
pub const fn is_valid_cell(value: u32) -> bool {
    value == 0 || (value >= 2 && value <= MAX_CELL_VALUE && value.is_power_of_two())
}

/// Returns `true` if two neighbouring cells would merge when pushed together.
const fn can_merge(a: u32, b: u32) -> bool {
    a == b && a < MAX_CELL_VALUE
}

/// Returns the exponent of a tile value (`0 -> 0`, `2^k -> k`).
///
/// This is the index front-ends use for per-tile styling tables.
///
/// ```
/// use oxid2048_engine::tile_exponent;
///
/// assert_eq!(tile_exponent(0), 0);
/// assert_eq!(tile_exponent(2), 1);
/// assert_eq!(tile_exponent(2048), 11);
/// ```
#[must_use]
pub const fn tile_exponent(value: u32) -> u32 {
    if value == 0 { 0 } else { value.trailing_zeros() }
}

/// Fixed 4×4 grid of tile values stored in row-major order.
///
/// A cell is `0` (empty) or a power of two `>= 2`. Grids are small `Copy`
/// values: moves produce a new grid, and comparing two grids is a plain
/// element-wise equality over all 16 cells.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Direction, Grid};
///
/// let grid = Grid::from_rows([
///     [2, 2, 2, 2],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ])
/// .unwrap();
///
/// let slide = grid.slid(Direction::Left);
/// assert_eq!(slide.grid.row(0), [4, 4, 0, 0]);
/// assert_eq!(slide.score_gained, 8);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[[u32; 4]; 4]", into = "[[u32; 4]; 4]")]
pub struct Grid {
    cells: [u32; CELL_COUNT],
}

/// Outcome of sliding a grid in one direction, before any tile is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    /// The candidate grid.
    pub grid: Grid,
    /// Sum of the values of all tiles produced by merges.
    pub score_gained: u64,
    /// Number of merges across all four lines.
    pub merges: u32,
}

impl Grid {
    pub const EMPTY: Self = Self {
        cells: [0; CELL_COUNT],
    };

    /// Builds a grid from row-major cells, validating every value.
    pub fn from_cells(cells: [u32; CELL_COUNT]) -> Result<Self, InvalidGridError> {
        if let Some(i) = cells.iter().position(|&v| !is_valid_cell(v)) {
            return Err(InvalidGridError {
                row: i / GRID_SIZE,
                col: i % GRID_SIZE,
                value: cells[i],
            });
        }
        Ok(Self { cells })
    }

    /// Builds a grid from rows, validating every value.
    pub fn from_rows(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, InvalidGridError> {
        let mut cells = [0; CELL_COUNT];
        for (dst, src) in cells.chunks_exact_mut(GRID_SIZE).zip(rows) {
            dst.copy_from_slice(&src);
        }
        Self::from_cells(cells)
    }

    /// Returns the cells in row-major order.
    #[must_use]
    pub const fn cells(&self) -> &[u32; CELL_COUNT] {
        &self.cells
    }

    #[must_use]
    pub const fn cell(&self, row: usize, col: usize) -> u32 {
        self.cells[row * GRID_SIZE + col]
    }

    pub(crate) const fn set_cell(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * GRID_SIZE + col] = value;
    }

    #[must_use]
    pub fn row(&self, row: usize) -> [u32; GRID_SIZE] {
        let mut out = [0; GRID_SIZE];
        out.copy_from_slice(&self.cells[row * GRID_SIZE..][..GRID_SIZE]);
        out
    }

    #[must_use]
    pub fn rows(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        std::array::from_fn(|row| self.row(row))
    }

    /// Returns the number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    /// Returns the sum of all tile values.
    #[must_use]
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Returns the largest tile value, or `0` for an empty grid.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Iterates over empty cells as `(row, col)` in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| (i / GRID_SIZE, i % GRID_SIZE))
    }

    /// Maps position `k` along line `index` to a `(row, col)` pair.
    ///
    /// Position `0` is the edge nearest the travel direction.
    const fn line_position(direction: Direction, index: usize, k: usize) -> (usize, usize) {
        let along = if direction.is_reversed() {
            GRID_SIZE - 1 - k
        } else {
            k
        };
        match direction.axis() {
            Axis::Row => (index, along),
            Axis::Column => (along, index),
        }
    }

    fn line(&self, direction: Direction, index: usize) -> [u32; GRID_SIZE] {
        std::array::from_fn(|k| {
            let (row, col) = Self::line_position(direction, index, k);
            self.cell(row, col)
        })
    }

    fn set_line(&mut self, direction: Direction, index: usize, line: [u32; GRID_SIZE]) {
        for (k, value) in line.into_iter().enumerate() {
            let (row, col) = Self::line_position(direction, index, k);
            self.set_cell(row, col, value);
        }
    }

    /// Slides and merges every line toward `direction`.
    ///
    /// This is the deterministic part of a move: no tile is spawned and the
    /// grid itself is left untouched. The caller decides whether the move
    /// changed anything by comparing the candidate with the current grid.
    #[must_use]
    pub fn slid(&self, direction: Direction) -> Slide {
        let mut grid = Self::EMPTY;
        let mut score_gained = 0;
        let mut merges = 0;
        for index in 0..GRID_SIZE {
            let merged = merge_line(self.line(direction, index));
            grid.set_line(direction, index, merged.cells);
            score_gained += merged.score_gained;
            merges += merged.merges;
        }
        Slide {
            grid,
            score_gained,
            merges,
        }
    }

    /// Returns `true` if any two 4-adjacent cells hold the same mergeable value.
    ///
    /// Each cell is compared with its right and lower neighbours; the scan
    /// stops at the first equal pair. Pairs of [`MAX_CELL_VALUE`] are skipped.
    #[must_use]
    pub fn has_adjacent_equal(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let value = self.cell(row, col);
                if col + 1 < GRID_SIZE && can_merge(value, self.cell(row, col + 1)) {
                    return true;
                }
                if row + 1 < GRID_SIZE && can_merge(value, self.cell(row + 1, col)) {
                    return true;
                }
            }
        }
        false
    }

    /// Returns `true` if no move can change the grid: it is full and no two
    /// 4-adjacent cells are equal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.empty_count() == 0 && !self.has_adjacent_equal()
    }

    /// Returns the grid rotated 90° clockwise.
    ///
    /// Sliding commutes with rotation: rotating then sliding in
    /// `direction.rotated_clockwise()` equals sliding in `direction` then rotating.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let mut rotated = Self::EMPTY;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                rotated.set_cell(col, GRID_SIZE - 1 - row, self.cell(row, col));
            }
        }
        rotated
    }
}

impl TryFrom<[[u32; GRID_SIZE]; GRID_SIZE]> for Grid {
    type Error = InvalidGridError;

    fn try_from(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for [[u32; GRID_SIZE]; GRID_SIZE] {
    fn from(grid: Grid) -> Self {
        grid.rows()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grid").field(&self.rows()).finish()
    }
}

/// Renders the grid as right-aligned columns, one row per line, with `.`
/// for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for (i, row) in self.rows().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, value) in row.into_iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                if value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
        }
        Ok(())
    }
}
