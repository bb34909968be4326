use std::path::PathBuf;

use chrono::Utc;
use oxid2048_engine::{EngineConfig, TileSeed};
use oxid2048_training::{
    agent::AgentKind,
    episode::{DEFAULT_STEP_LIMIT, EpisodeConfig},
    training_loop::{TrainingConfig, TrainingLoop},
};
use rand::Rng as _;

use crate::{schema::record::RecordedSession, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Agent to train (random, greedy, epsilon)
    #[arg(long, default_value = "epsilon")]
    agent: AgentKind,
    /// Number of episodes to play
    #[arg(long, default_value_t = 1000)]
    episodes: u64,
    /// Log progress every N episodes
    #[arg(long, default_value_t = 5)]
    log_every: u64,
    /// Log the final grid every N episodes (0 disables it)
    #[arg(long, default_value_t = 100)]
    show_grid_every: u64,
    /// Base seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<TileSeed>,
    /// Maximum number of actions per episode
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: u64,
    /// Save the best episode as a recording
    #[arg(long)]
    save_recording: bool,
    /// Directory for recordings
    #[arg(long, default_value = "./data/recordings")]
    record_dir: PathBuf,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        agent,
        episodes,
        log_every,
        show_grid_every,
        seed,
        step_limit,
        save_recording,
        record_dir,
    } = arg;

    let base_seed = seed.unwrap_or_else(|| rand::rng().random());
    let config = TrainingConfig {
        log_every: *log_every,
        show_grid_every: *show_grid_every,
        episode: EpisodeConfig {
            engine: EngineConfig::default(),
            step_limit: *step_limit,
            record_moves: *save_recording,
        },
        ..TrainingConfig::new(*episodes, base_seed)
    };

    #[expect(clippy::cast_possible_truncation)]
    let agent_seed = base_seed.to_u128() as u64;
    let mut training = TrainingLoop::new(agent.build(agent_seed), config);
    let report = training.run();

    if let Some(mean) = report.recent_mean {
        log::info!(
            "done: {} episodes, {} steps, avg-score {mean:.1}",
            report.episodes,
            report.total_steps
        );
    }

    let Some(best) = &report.best else {
        return Ok(());
    };
    log::info!(
        "best episode: seed {}, score {}, max tile {}",
        best.seed,
        best.score(),
        best.stats.max_tile()
    );
    log::info!("best final grid:\n{}", best.final_grid);

    if *save_recording {
        let now = Utc::now();
        let session = RecordedSession::from_summary(best, config.episode.engine, *agent, now);
        let path = record_dir.join(format!("recording_{}.json", now.format("%Y%m%d_%H%M%S")));
        util::save_json(&session, Some(&path))?;
        log::info!("recording saved to {}", path.display());
    }

    Ok(())
}
