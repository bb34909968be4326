use anyhow::ensure;
use chrono::{DateTime, Utc};
use oxid2048_engine::{Direction, EngineConfig, GameStats, GridEngine, TileSeed};
use oxid2048_training::{agent::AgentKind, episode::EpisodeSummary};
use serde::{Deserialize, Serialize};

/// Recorded game with everything needed to replay it.
///
/// Spawns are not stored: replaying `moves` from `seed` with `config`
/// regenerates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedSession {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed of the tile spawner
    pub seed: TileSeed,
    pub config: EngineConfig,
    /// Agent that played the game
    pub agent: AgentKind,
    /// Final game statistics at the time of recording
    pub final_stats: GameStats,
    /// Every chosen direction, including ones that left the grid unchanged
    pub moves: Vec<Direction>,
}

impl RecordedSession {
    pub fn from_summary(
        summary: &EpisodeSummary,
        config: EngineConfig,
        agent: AgentKind,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            recorded_at,
            seed: summary.seed,
            config,
            agent,
            final_stats: summary.stats,
            moves: summary.moves.clone(),
        }
    }

    /// Replays the recorded moves and checks the result against the stored statistics.
    pub fn replay(&self) -> anyhow::Result<GridEngine> {
        let engine =
            oxid2048_training::episode::replay_moves(self.seed, self.config, &self.moves);
        let stats = engine.stats();
        ensure!(
            stats.score() == self.final_stats.score(),
            "replayed score {} does not match recorded score {}",
            stats.score(),
            self.final_stats.score()
        );
        ensure!(
            stats.round() == self.final_stats.round(),
            "replayed rounds {} do not match recorded rounds {}",
            stats.round(),
            self.final_stats.round()
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use oxid2048_training::{
        agent::RandomAgent,
        episode::{EpisodeConfig, run_episode},
    };

    use super::*;

    fn recorded() -> RecordedSession {
        let seed = TileSeed::from_u128(0xfeed);
        let mut engine = GridEngine::with_seed(seed);
        let config = EpisodeConfig::default();
        let summary = run_episode(&mut engine, &mut RandomAgent::new(2), seed, &config);
        RecordedSession::from_summary(&summary, config.engine, AgentKind::Random, Utc::now())
    }

    #[test]
    fn test_replay_reproduces_final_stats() {
        let session = recorded();
        let engine = session.replay().unwrap();
        assert_eq!(*engine.stats(), session.final_stats);
        assert!(engine.is_terminal());
    }

    #[test]
    fn test_replay_detects_tampering() {
        let mut session = recorded();
        session.moves.truncate(session.moves.len() / 2);
        assert!(session.replay().is_err());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let session = recorded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        crate::util::save_json(&session, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(&format!("\"{}\"", session.seed)));

        let loaded: RecordedSession = crate::util::read_json_file("recording", &path).unwrap();
        assert_eq!(loaded.moves, session.moves);
        loaded.replay().unwrap();
    }
}
