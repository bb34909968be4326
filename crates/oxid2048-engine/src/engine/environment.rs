use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{CELL_COUNT, Direction, Grid, InvalidGridError, tile_exponent};

use super::grid_engine::GridEngine;

/// Size of the action space exposed to agents.
pub const ACTION_COUNT: usize = Direction::LEN;

/// Length of the observation vector.
pub const FEATURE_COUNT: usize = CELL_COUNT;

/// Divisor applied to tile exponents in observations (`2 -> 0.1`, `4 -> 0.2`, ...).
pub const OBSERVATION_SCALE: f32 = 10.0;

/// Divisor applied to `log2(score_gained)` for merging moves.
pub const MERGE_REWARD_SCALE: f32 = 8.0;

/// Reward for a move that leaves the grid unchanged.
pub const UNCHANGED_MOVE_REWARD: f32 = -0.5;

/// Extra penalty subtracted when a move ends the game.
pub const TERMINAL_PENALTY: f32 = 0.5;

/// Normalized view of the grid fed to numeric models.
///
/// Cells are flattened row-major; an empty cell maps to `0.0` and a tile `v`
/// maps to `log2(v) / 10`.
///
/// ```
/// use oxid2048_engine::{Grid, Observation};
///
/// let grid = Grid::from_rows([[16, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
/// let observation = Observation::from(&grid);
/// assert!((observation[0] - 0.4).abs() < 1e-6);
/// assert_eq!(observation[1], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation([f32; FEATURE_COUNT]);

impl Observation {
    #[must_use]
    pub const fn values(&self) -> &[f32; FEATURE_COUNT] {
        &self.0
    }

    /// Decodes the observation back into the grid it was built from.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_grid(&self) -> Result<Grid, InvalidGridError> {
        let values = self.0;
        let cells = values.map(|v| {
            let exponent = (v * OBSERVATION_SCALE).round().max(0.0) as u32;
            if exponent == 0 {
                0
            } else {
                1_u32.checked_shl(exponent).unwrap_or(1)
            }
        });
        Grid::from_cells(cells)
    }
}

impl From<&Grid> for Observation {
    #[expect(clippy::cast_precision_loss)]
    fn from(grid: &Grid) -> Self {
        let cells = *grid.cells();
        Self(cells.map(|v| tile_exponent(v) as f32 / OBSERVATION_SCALE))
    }
}

impl Index<usize> for Observation {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// What an agent receives after taking an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    /// `true` if the grid is terminal after the move.
    pub done: bool,
    /// `true` if the move changed the grid.
    pub moved: bool,
    pub score_gained: u64,
}

/// Shapes the reward for one move.
///
/// - Unchanged grid: `-0.5`
/// - Changed grid, no merge: `0`
/// - Changed grid with merges: `log2(score_gained) / 8`
/// - Terminal afterwards: an additional `-0.5` on top of the above
///
/// Merged tiles are at least 4, so `score_gained` is either `0` or `>= 4`
/// and the logarithm is always positive when taken.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn shape_reward(moved: bool, score_gained: u64, done: bool) -> f32 {
    let mut reward = match (moved, score_gained) {
        (false, _) => UNCHANGED_MOVE_REWARD,
        (true, 0) => 0.0,
        (true, gained) => (gained as f32).log2() / MERGE_REWARD_SCALE,
    };
    if done {
        reward -= TERMINAL_PENALTY;
    }
    reward
}

impl GridEngine {
    /// Returns the normalized observation of the current grid.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::from(self.grid())
    }

    /// Resets the game and returns the first observation.
    pub fn reset_observation(&mut self) -> Observation {
        self.reset();
        self.observation()
    }

    /// Takes one action on behalf of an agent.
    ///
    /// Wraps [`slide`](Self::slide): captures grid and score before and after
    /// the move and shapes the reward with [`shape_reward`].
    pub fn step(&mut self, direction: Direction) -> Step {
        let grid_before = *self.grid();
        let score_before = self.score();
        self.slide(direction);
        let moved = *self.grid() != grid_before;
        let score_gained = self.score() - score_before;
        let done = self.is_terminal();
        Step {
            observation: self.observation(),
            reward: shape_reward(moved, score_gained, done),
            done,
            moved,
            score_gained,
        }
    }
}
