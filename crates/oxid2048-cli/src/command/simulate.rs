use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use chrono::Utc;
use oxid2048_engine::{EngineConfig, TileSeed};
use oxid2048_training::{
    agent::AgentKind,
    episode::{DEFAULT_STEP_LIMIT, EpisodeConfig},
    evaluation,
};
use rand::Rng as _;

use crate::{schema::report::SimulationReport, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Agent to play with (random, greedy, epsilon)
    #[arg(long, default_value = "greedy")]
    agent: AgentKind,
    /// Number of episodes to play
    #[arg(long, default_value_t = 100)]
    episodes: usize,
    /// Base seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<TileSeed>,
    /// Maximum number of actions per episode
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: u64,
    /// Chance in percent that a spawned tile is a 4
    #[arg(long, default_value_t = oxid2048_engine::DEFAULT_FOUR_PROBABILITY)]
    four_probability: u32,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        agent,
        episodes,
        seed,
        step_limit,
        four_probability,
        output,
    } = arg;

    let engine_config = EngineConfig::new(*four_probability)?;
    let config = EpisodeConfig {
        engine: engine_config,
        step_limit: *step_limit,
        record_moves: false,
    };
    let base_seed = seed.unwrap_or_else(|| rand::rng().random());

    log::info!("simulating {episodes} episodes with the {agent} agent (base seed {base_seed})");
    let started = Instant::now();
    let summaries = evaluation::evaluate_parallel(base_seed, *episodes, &config, |index| {
        agent.build(index as u64)
    });
    log::info!("finished in {:.2?}", started.elapsed());

    let report =
        SimulationReport::new(*agent, base_seed, engine_config, &summaries, Utc::now())
            .context("no episodes were played")?;
    log::info!(
        "score: mean {:.1}, median {:.0}, max {:.0}, std-dev {:.1}",
        report.score.mean,
        report.score.median,
        report.score.max,
        report.score.std_dev
    );
    for count in &report.max_tile_counts {
        log::info!("  max tile {:>6}: {} episodes", count.tile, count.episodes);
    }
    let truncated = summaries.iter().filter(|s| s.truncated).count();
    if truncated > 0 {
        log::warn!("{truncated} episodes hit the step limit of {step_limit}");
    }

    util::save_json(&report, output.as_deref())?;
    Ok(())
}
