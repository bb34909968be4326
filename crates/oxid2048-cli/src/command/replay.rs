use std::path::PathBuf;

use crate::{schema::record::RecordedSession, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg { recording_file } = arg;

    log::info!("loading recording from {}", recording_file.display());
    let session: RecordedSession = util::read_json_file("recording", recording_file)?;
    log::info!(
        "recorded at {} by the {} agent: {} moves, seed {}",
        session.recorded_at,
        session.agent,
        session.moves.len(),
        session.seed
    );

    let engine = session.replay()?;
    let stats = engine.stats();
    log::info!(
        "replay verified: score {}, rounds {}, max tile {}",
        stats.score(),
        stats.round(),
        stats.max_tile()
    );
    println!("{}", engine.grid());

    Ok(())
}
