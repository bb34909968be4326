//! Game engine state and the agent-facing step interface.
//!
//! - [`GridEngine`] - One game: grid, statistics and tile spawner
//! - [`TileSpawner`] / [`TileSeed`] - Seeded random tile placement
//! - [`GameStats`] - Score, round, merge count and largest tile
//! - [`Observation`] / [`Step`] - Normalized state and shaped reward for agents
//!
//! # Game Flow
//!
//! 1. Create a [`GridEngine`] (two tiles are spawned)
//! 2. Call [`GridEngine::slide`] (or [`GridEngine::step`] from a training loop)
//! 3. A move that changes the grid spawns one tile and advances the round
//! 4. Repeat until [`GridEngine::is_terminal`]
//! 5. [`GridEngine::reset`] starts over
//!
//! ```
//! use oxid2048_engine::{Direction, GridEngine, TileSeed};
//!
//! let mut engine = GridEngine::with_seed(TileSeed::from_u128(7));
//! let mut observation = engine.reset_observation();
//! for direction in Direction::ALL.into_iter().cycle().take(100) {
//!     let step = engine.step(direction);
//!     observation = step.observation;
//!     if step.done {
//!         break;
//!     }
//! }
//! assert_eq!(observation, engine.observation());
//! ```

pub use self::{environment::*, game_stats::*, grid_engine::*, tile_spawner::*};

mod environment;
mod game_stats;
mod grid_engine;
mod tile_spawner;
