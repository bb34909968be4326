use std::thread;

use oxid2048_engine::{GridEngine, TileSeed};
use oxid2048_stats::descriptive::DescriptiveStats;

use crate::{
    agent::Agent,
    episode::{EpisodeConfig, EpisodeSummary, run_episode},
};

/// Plays `episodes` independent games in parallel.
///
/// Episode `i` is seeded with `base_seed.offset(i)` and played by a fresh
/// agent from `make_agent(i)`, so the result does not depend on how many
/// threads are used. Summaries are returned in episode order.
pub fn evaluate_parallel<A, F>(
    base_seed: TileSeed,
    episodes: usize,
    config: &EpisodeConfig,
    make_agent: F,
) -> Vec<EpisodeSummary>
where
    A: Agent,
    F: Fn(usize) -> A + Sync,
{
    let threads = thread::available_parallelism().map_or(1, usize::from);
    let chunk_size = episodes.div_ceil(threads).max(1);
    let mut results = (0..episodes).map(|_| None).collect::<Vec<_>>();

    thread::scope(|s| {
        for (chunk_index, slots) in results.chunks_mut(chunk_size).enumerate() {
            let make_agent = &make_agent;
            s.spawn(move || {
                let mut engine = GridEngine::with_config(base_seed, config.engine);
                for (offset, slot) in slots.iter_mut().enumerate() {
                    let index = chunk_index * chunk_size + offset;
                    let mut agent = make_agent(index);
                    *slot = Some(run_episode(
                        &mut engine,
                        &mut agent,
                        base_seed.offset(index as u64),
                        config,
                    ));
                }
            });
        }
    });

    results.into_iter().flatten().collect()
}

/// Aggregate view over a batch of episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub score: DescriptiveStats,
    pub rounds: DescriptiveStats,
    pub max_tile: DescriptiveStats,
    /// Share of episodes (0.0 to 1.0) whose largest tile reached 2048.
    pub win_rate: f64,
}

impl EvaluationReport {
    /// Tile value counted as a win in [`Self::win_rate`].
    pub const WIN_TILE: u32 = 2048;

    /// Summarizes `episodes`, or returns `None` if there are none.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(episodes: &[EpisodeSummary]) -> Option<Self> {
        let score = DescriptiveStats::new(episodes.iter().map(|e| e.stats.score() as f64))?;
        let rounds = DescriptiveStats::new(episodes.iter().map(|e| e.stats.round() as f64))?;
        let max_tile = DescriptiveStats::new(episodes.iter().map(|e| f64::from(e.stats.max_tile())))?;
        let wins = episodes
            .iter()
            .filter(|e| e.stats.max_tile() >= Self::WIN_TILE)
            .count();
        Some(Self {
            score,
            rounds,
            max_tile,
            win_rate: wins as f64 / episodes.len() as f64,
        })
    }
}
