use arrayvec::ArrayVec;

use super::{GRID_SIZE, MAX_CELL_VALUE};

/// Result of compacting and merging a single line toward its leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMerge {
    /// Cells ordered from the leading edge, zero-filled after the last tile.
    pub cells: [u32; GRID_SIZE],
    /// Sum of the values of all tiles produced by merges.
    pub score_gained: u64,
    /// Number of merges performed.
    pub merges: u32,
}

/// Compacts and merges one line.
///
/// `line` is read from the edge nearest the travel direction. Non-zero values
/// are extracted in order, then adjacent equal pairs are merged in a single
/// forward sweep: a merge consumes both tiles, so a freshly doubled tile is
/// never compared against its new neighbour in the same move. Two tiles of
/// [`MAX_CELL_VALUE`] have no representable sum and stay apart.
///
/// ```
/// use oxid2048_engine::merge_line;
///
/// let merged = merge_line([2, 2, 2, 2]);
/// assert_eq!(merged.cells, [4, 4, 0, 0]);
/// assert_eq!(merged.score_gained, 8);
/// ```
#[must_use]
pub fn merge_line(line: [u32; GRID_SIZE]) -> LineMerge {
    let values = line
        .into_iter()
        .filter(|&v| v != 0)
        .collect::<ArrayVec<u32, GRID_SIZE>>();

    let mut merged = ArrayVec::<u32, GRID_SIZE>::new();
    let mut score_gained = 0;
    let mut merges = 0;
    let mut i = 0;
    while i < values.len() {
        let value = values[i];
        if values.get(i + 1) == Some(&value) && value < MAX_CELL_VALUE {
            let doubled = value * 2;
            merged.push(doubled);
            score_gained += u64::from(doubled);
            merges += 1;
            i += 2;
        } else {
            merged.push(value);
            i += 1;
        }
    }

    let mut cells = [0; GRID_SIZE];
    cells[..merged.len()].copy_from_slice(&merged);
    LineMerge {
        cells,
        score_gained,
        merges,
    }
}
