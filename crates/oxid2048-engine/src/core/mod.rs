//! Core grid data structures and the deterministic move rule.
//!
//! - [`Grid`] - Fixed 4×4 row-major grid of tile values
//! - [`Direction`] - The four directions of travel, in action-index order
//! - [`merge_line`] - Compaction and pairwise merge of a single line
//!
//! Nothing here involves randomness: [`Grid::slid`] computes the candidate
//! grid and score for a move, and [`Grid::is_terminal`] is derived from the
//! grid on demand. Tile spawning lives in the [`engine`](crate::engine) module.

pub use self::{direction::*, grid::*, line::*};

pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod line;
