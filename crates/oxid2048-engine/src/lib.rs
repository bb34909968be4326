//! Grid transition engine for the 2048 tile-merging puzzle.
//!
//! The crate is split the same way as the game itself:
//!
//! - [`core`] - Pure data: the 4×4 [`Grid`], [`Direction`]s and the line merge rule
//! - [`engine`] - Stateful play: [`GridEngine`], tile spawning, statistics and the
//!   reinforcement-learning [`Step`] wrapper
//!
//! # Example
//!
//! ```
//! use oxid2048_engine::{Direction, GridEngine, TileSeed};
//!
//! let mut engine = GridEngine::with_seed(TileSeed::from_u128(42));
//! assert_eq!(engine.grid().tile_count(), 2);
//!
//! for direction in Direction::ALL {
//!     if engine.slide(direction).is_moved() {
//!         break;
//!     }
//! }
//! assert_eq!(engine.round(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown direction: {name:?}")]
pub struct ParseDirectionError {
    name: String,
}

impl ParseDirectionError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("action index out of range: {index} (expected 0..4)")]
pub struct InvalidActionError {
    index: usize,
}

impl InvalidActionError {
    pub(crate) const fn new(index: usize) -> Self {
        Self { index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({row}, {col}) holds {value}, which is neither empty nor a power of two")]
pub struct InvalidGridError {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("four probability must be a percentage (0..=100), got {four_probability}")]
pub struct InvalidConfigError {
    pub four_probability: u32,
}
