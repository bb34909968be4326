use chrono::{DateTime, Utc};
use oxid2048_engine::{EngineConfig, TileSeed};
use oxid2048_stats::descriptive::{DescriptiveStats, percentile};
use oxid2048_training::{
    agent::AgentKind,
    episode::EpisodeSummary,
    evaluation::EvaluationReport,
};
use serde::{Deserialize, Serialize};

/// JSON report written by `simulate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    pub agent: AgentKind,
    pub base_seed: TileSeed,
    pub config: EngineConfig,
    pub episode_count: usize,
    pub score: StatsSummary,
    pub rounds: StatsSummary,
    pub max_tile: StatsSummary,
    pub win_rate: f64,
    /// Count of episodes per largest tile reached, ascending by tile.
    pub max_tile_counts: Vec<TileCount>,
    pub episodes: Vec<EpisodeRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCount {
    pub tile: u32,
    pub episodes: usize,
}

/// One line per episode, without the move list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRow {
    pub seed: TileSeed,
    pub score: u64,
    pub rounds: u64,
    pub max_tile: u32,
    pub steps: u64,
    pub unchanged_moves: u64,
    pub total_reward: f64,
    pub truncated: bool,
}

impl StatsSummary {
    fn new(stats: &DescriptiveStats, values: impl IntoIterator<Item = f64>) -> Self {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
            p90: percentile(&values, 90.0).unwrap_or(stats.max),
        }
    }
}

impl From<&EpisodeSummary> for EpisodeRow {
    fn from(summary: &EpisodeSummary) -> Self {
        Self {
            seed: summary.seed,
            score: summary.stats.score(),
            rounds: summary.stats.round(),
            max_tile: summary.stats.max_tile(),
            steps: summary.steps,
            unchanged_moves: summary.unchanged_moves,
            total_reward: summary.total_reward,
            truncated: summary.truncated,
        }
    }
}

impl SimulationReport {
    /// Builds the report, or returns `None` when no episode was played.
    #[expect(clippy::cast_precision_loss)]
    pub fn new(
        agent: AgentKind,
        base_seed: TileSeed,
        config: EngineConfig,
        summaries: &[EpisodeSummary],
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        let evaluation = EvaluationReport::new(summaries)?;

        let mut max_tile_counts: Vec<TileCount> = vec![];
        let mut tiles = summaries
            .iter()
            .map(|s| s.stats.max_tile())
            .collect::<Vec<_>>();
        tiles.sort_unstable();
        for tile in tiles {
            match max_tile_counts.last_mut() {
                Some(last) if last.tile == tile => last.episodes += 1,
                _ => max_tile_counts.push(TileCount { tile, episodes: 1 }),
            }
        }

        Some(Self {
            generated_at,
            agent,
            base_seed,
            config,
            episode_count: summaries.len(),
            score: StatsSummary::new(
                &evaluation.score,
                summaries.iter().map(|s| s.stats.score() as f64),
            ),
            rounds: StatsSummary::new(
                &evaluation.rounds,
                summaries.iter().map(|s| s.stats.round() as f64),
            ),
            max_tile: StatsSummary::new(
                &evaluation.max_tile,
                summaries.iter().map(|s| f64::from(s.stats.max_tile())),
            ),
            win_rate: evaluation.win_rate,
            max_tile_counts,
            episodes: summaries.iter().map(EpisodeRow::from).collect(),
        })
    }
}
