use oxid2048_engine::{GridEngine, TileSeed};
use oxid2048_stats::window::ScoreWindow;
use serde::{Deserialize, Serialize};

use crate::{
    agent::Agent,
    episode::{EpisodeConfig, EpisodeSummary, run_episode},
};

/// Parameters of a sequential training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub episodes: u64,
    /// Log a progress line every this many episodes (0 disables it).
    pub log_every: u64,
    /// Log the final grid every this many episodes (0 disables it).
    pub show_grid_every: u64,
    /// Number of recent scores kept for the rolling average.
    pub window_capacity: usize,
    /// Number of most recent scores averaged in progress lines.
    pub report_window: usize,
    pub base_seed: TileSeed,
    pub episode: EpisodeConfig,
}

impl TrainingConfig {
    #[must_use]
    pub fn new(episodes: u64, base_seed: TileSeed) -> Self {
        Self {
            episodes,
            log_every: 5,
            show_grid_every: 100,
            window_capacity: 4000,
            report_window: 1500,
            base_seed,
            episode: EpisodeConfig::default(),
        }
    }
}

/// What a finished training run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episodes: u64,
    pub total_steps: u64,
    /// Score of every episode in order.
    pub scores: Vec<u64>,
    /// Rolling mean over the last `report_window` scores at the end of the run.
    pub recent_mean: Option<f64>,
    /// Highest-scoring episode; the first one wins ties.
    pub best: Option<EpisodeSummary>,
}

/// Plays episodes one after another with a single learning agent.
///
/// Episode `i` is seeded with `base_seed.offset(i)`. Progress is reported
/// through the `log` facade.
#[derive(Debug)]
pub struct TrainingLoop<A> {
    agent: A,
    engine: GridEngine,
    config: TrainingConfig,
    window: ScoreWindow,
}

impl<A> TrainingLoop<A>
where
    A: Agent,
{
    #[must_use]
    pub fn new(agent: A, config: TrainingConfig) -> Self {
        Self {
            agent,
            engine: GridEngine::with_config(config.base_seed, config.episode.engine),
            window: ScoreWindow::new(config.window_capacity.max(1)),
            config,
        }
    }

    #[must_use]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    #[must_use]
    pub fn window(&self) -> &ScoreWindow {
        &self.window
    }

    /// Runs every configured episode and returns the report.
    #[expect(clippy::cast_precision_loss)]
    pub fn run(&mut self) -> TrainingReport {
        let mut scores = Vec::new();
        let mut total_steps = 0;
        let mut best: Option<EpisodeSummary> = None;

        log::info!(
            "training {} for {} episodes (base seed {})",
            self.agent.name(),
            self.config.episodes,
            self.config.base_seed
        );

        for episode in 0..self.config.episodes {
            let seed = self.config.base_seed.offset(episode);
            let summary = run_episode(&mut self.engine, &mut self.agent, seed, &self.config.episode);
            let number = episode + 1;

            total_steps += summary.steps;
            scores.push(summary.score());
            self.window.push(summary.score() as f64);
            log::debug!(
                "episode {number}: score {}, rounds {}, max tile {}, reward {:.3}",
                summary.score(),
                summary.stats.round(),
                summary.stats.max_tile(),
                summary.total_reward
            );

            if is_due(number, self.config.log_every) {
                log::info!(
                    "episode {number}, steps {total_steps}, score {}, avg-score {:.1}",
                    summary.score(),
                    self.window
                        .mean_of_last(self.config.report_window)
                        .unwrap_or_default()
                );
            }
            if is_due(number, self.config.show_grid_every) {
                log::info!("final grid of episode {number}:\n{}", summary.final_grid);
            }

            if best.as_ref().is_none_or(|b| summary.score() > b.score()) {
                best = Some(summary);
            }
        }

        TrainingReport {
            episodes: self.config.episodes,
            total_steps,
            scores,
            recent_mean: self.window.mean_of_last(self.config.report_window),
            best,
        }
    }
}

fn is_due(number: u64, every: u64) -> bool {
    every != 0 && number % every == 0
}
