use oxid2048_engine::{Direction, EngineConfig, GameStats, Grid, GridEngine, TileSeed};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Transition};

/// Step cap used when no explicit limit is given.
pub const DEFAULT_STEP_LIMIT: u64 = 100_000;

/// How a single episode is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    pub engine: EngineConfig,
    /// Stop after this many steps even if the game is not over.
    pub step_limit: u64,
    /// Keep the chosen actions in [`EpisodeSummary::moves`].
    pub record_moves: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            step_limit: DEFAULT_STEP_LIMIT,
            record_moves: true,
        }
    }
}

/// Outcome of one played episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub seed: TileSeed,
    pub stats: GameStats,
    /// Actions taken, including ones that left the grid unchanged.
    pub steps: u64,
    pub unchanged_moves: u64,
    pub total_reward: f64,
    /// `true` if the step limit ended the episode before the game was over.
    pub truncated: bool,
    pub final_grid: Grid,
    /// Every chosen action in order; empty unless moves were recorded.
    pub moves: Vec<Direction>,
}

impl EpisodeSummary {
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.stats.score()
    }
}

/// Plays one game from `seed` to the end (or the step limit).
///
/// The engine is reseeded first, so the same seed, configuration and agent
/// behavior always reproduce the same game. Every step is reported to the
/// agent through [`Agent::observe`], and [`Agent::end_episode`] is called
/// once at the end.
pub fn run_episode<A>(
    engine: &mut GridEngine,
    agent: &mut A,
    seed: TileSeed,
    config: &EpisodeConfig,
) -> EpisodeSummary
where
    A: Agent + ?Sized,
{
    engine.reset_with_seed(seed, config.engine);
    let mut observation = engine.observation();
    let mut moves = vec![];
    let mut steps = 0;
    let mut unchanged_moves = 0;
    let mut total_reward = 0.0;
    let mut done = engine.is_terminal();

    while !done && steps < config.step_limit {
        let action = agent.choose_action(&observation);
        let step = engine.step(action);
        steps += 1;
        if !step.moved {
            unchanged_moves += 1;
        }
        total_reward += f64::from(step.reward);
        if config.record_moves {
            moves.push(action);
        }
        agent.observe(&Transition {
            observation,
            action,
            reward: step.reward,
            next_observation: step.observation,
            done: step.done,
        });
        observation = step.observation;
        done = step.done;
    }
    agent.end_episode();

    EpisodeSummary {
        seed,
        stats: *engine.stats(),
        steps,
        unchanged_moves,
        total_reward,
        truncated: !done,
        final_grid: *engine.grid(),
        moves,
    }
}

/// Replays recorded actions from `seed` and returns the resulting engine.
///
/// Feeding back the moves of an [`EpisodeSummary`] reproduces its final grid
/// and statistics exactly.
#[must_use]
pub fn replay_moves(seed: TileSeed, config: EngineConfig, moves: &[Direction]) -> GridEngine {
    let mut engine = GridEngine::with_config(seed, config);
    for &direction in moves {
        engine.slide(direction);
    }
    engine
}
