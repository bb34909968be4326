use serde::{Deserialize, Serialize};

/// Running statistics of one game.
///
/// - **Score**: Sum of the values of every tile produced by a merge
/// - **Round**: Number of moves that changed the grid
/// - **Merges**: Total number of merges
/// - **Max tile**: Largest tile seen on the grid
///
/// The score never decreases within a game; only [`GridEngine::reset`]
/// returns it to zero.
///
/// [`GridEngine::reset`]: crate::GridEngine::reset
///
/// # Example
///
/// ```
/// use oxid2048_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_move(8, 2, 4);
///
/// assert_eq!(stats.score(), 8);
/// assert_eq!(stats.round(), 1);
/// assert_eq!(stats.merges(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    round: u64,
    merges: u64,
    max_tile: u32,
}

impl GameStats {
    /// Creates statistics with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            round: 0,
            merges: 0,
            max_tile: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    #[must_use]
    pub const fn merges(&self) -> u64 {
        self.merges
    }

    #[must_use]
    pub const fn max_tile(&self) -> u32 {
        self.max_tile
    }

    /// Records a tile seen on the grid (initial spawns included).
    pub const fn observe_tile(&mut self, value: u32) {
        if value > self.max_tile {
            self.max_tile = value;
        }
    }

    /// Updates statistics after a move that changed the grid.
    ///
    /// # Arguments
    ///
    /// * `score_gained` - Sum of merged tile values
    /// * `merges` - Number of merges performed
    /// * `max_tile` - Largest tile on the grid after the move
    pub fn complete_move(&mut self, score_gained: u64, merges: u32, max_tile: u32) {
        self.score += score_gained;
        self.merges += u64::from(merges);
        self.round += 1;
        self.observe_tile(max_tile);
    }
}
