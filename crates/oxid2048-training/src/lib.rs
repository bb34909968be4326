//! Agents, episode runners and training loops on top of the 2048 engine.
//!
//! The engine exposes a reinforcement-learning style interface
//! ([`GridEngine::step`](oxid2048_engine::GridEngine::step)); this crate
//! drives it.
//!
//! # Architecture
//!
//! ```text
//! Agent (random / greedy / epsilon-greedy)
//!     ↓ chooses actions for
//! run_episode (one seeded game)
//!     ↓ used by
//! evaluate_parallel (many games on scoped threads)
//! TrainingLoop      (sequential games, one learning agent)
//!     ↓ produce
//! EpisodeSummary / EvaluationReport / TrainingReport
//! ```
//!
//! # Example
//!
//! ```
//! use oxid2048_engine::{GridEngine, TileSeed};
//! use oxid2048_training::{
//!     agent::GreedyAgent,
//!     episode::{EpisodeConfig, run_episode},
//! };
//!
//! let seed = TileSeed::from_u128(2048);
//! let mut engine = GridEngine::with_seed(seed);
//! let summary = run_episode(&mut engine, &mut GreedyAgent::new(), seed, &EpisodeConfig::default());
//! assert!(summary.final_grid.is_terminal());
//! assert_eq!(summary.moves.len() as u64, summary.steps);
//! ```

pub mod agent;
pub mod episode;
pub mod evaluation;
pub mod training_loop;
