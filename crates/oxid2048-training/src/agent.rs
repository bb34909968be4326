//! Agents that pick a direction from an observation.
//!
//! The [`Agent`] trait is the seam between the game and whatever learns to
//! play it. The engine only hands out [`Observation`]s, shaped rewards and a
//! done flag; agents choose actions and may consume [`Transition`]s (e.g. to
//! fill a replay buffer).
//!
//! Built-in agents:
//!
//! - [`RandomAgent`] - Uniform over the four actions
//! - [`GreedyAgent`] - One-step lookahead on the decoded grid
//! - [`EpsilonGreedyAgent`] - Greedy with probability ε, random otherwise,
//!   with ε growing on every observed transition

use std::fmt;

use oxid2048_engine::{ACTION_COUNT, Direction, Grid, Observation};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// One observed step of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub observation: Observation,
    pub action: Direction,
    pub reward: f32,
    pub next_observation: Observation,
    pub done: bool,
}

/// Something that plays the game.
pub trait Agent: fmt::Debug {
    /// Short name used in logs and recordings.
    fn name(&self) -> &'static str;

    /// Chooses the next action for `observation`.
    fn choose_action(&mut self, observation: &Observation) -> Direction;

    /// Receives the outcome of the last chosen action.
    fn observe(&mut self, _transition: &Transition) {}

    /// Called once when an episode finishes.
    fn end_episode(&mut self) {}
}

impl<A> Agent for Box<A>
where
    A: Agent + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn choose_action(&mut self, observation: &Observation) -> Direction {
        (**self).choose_action(observation)
    }

    fn observe(&mut self, transition: &Transition) {
        (**self).observe(transition);
    }

    fn end_episode(&mut self) {
        (**self).end_episode();
    }
}

/// Built-in agent selector.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
pub enum AgentKind {
    Random,
    #[default]
    Greedy,
    /// Epsilon-greedy with the default [`EpsilonSchedule`].
    Epsilon,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::Greedy => "greedy",
            Self::Epsilon => "epsilon",
        };
        f.write_str(name)
    }
}

impl AgentKind {
    /// Builds the agent, seeding any randomness it uses from `seed`.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Agent + Send> {
        match self {
            Self::Random => Box::new(RandomAgent::new(seed)),
            Self::Greedy => Box::new(GreedyAgent::new()),
            Self::Epsilon => Box::new(EpsilonGreedyAgent::new(seed, EpsilonSchedule::default())),
        }
    }
}

/// Picks one of the four actions uniformly at random.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: Pcg32,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action(&mut self, _observation: &Observation) -> Direction {
        Direction::from_index(self.rng.random_range(0..ACTION_COUNT))
    }
}

/// Picks the direction with the best immediate result.
///
/// Among directions that change the grid, prefers the largest merge score,
/// then the most empty cells, then the lowest action index. If nothing
/// changes the grid, or the observation does not decode to a valid grid
/// (logged as a warning), returns [`Direction::Up`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAgent {}

impl GreedyAgent {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Greedy choice for a grid.
    #[must_use]
    pub fn best_direction(grid: &Grid) -> Direction {
        let mut best: Option<(Direction, (u64, usize))> = None;
        for direction in Direction::ALL {
            let slide = grid.slid(direction);
            if slide.grid == *grid {
                continue;
            }
            let key = (slide.score_gained, slide.grid.empty_count());
            if best.is_none_or(|(_, best_key)| key > best_key) {
                best = Some((direction, key));
            }
        }
        best.map_or(Direction::Up, |(direction, _)| direction)
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose_action(&mut self, observation: &Observation) -> Direction {
        match observation.to_grid() {
            Ok(grid) => Self::best_direction(&grid),
            Err(err) => {
                log::warn!("greedy agent cannot decode observation ({err}); choosing up");
                Direction::Up
            }
        }
    }
}

/// How the greedy probability ε evolves.
///
/// ε starts at `start`, grows by `increment` per observed transition and is
/// capped at `max`. The resulting ε is always kept within `0.0..=1.0`; a NaN
/// anywhere in the schedule yields `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub max: f64,
    pub increment: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            start: 0.5,
            max: 0.99,
            increment: 1e-5,
        }
    }
}

/// Greedy with probability ε, uniformly random otherwise.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyAgent {
    rng: Pcg32,
    random: RandomAgent,
    schedule: EpsilonSchedule,
    epsilon: f64,
}

impl EpsilonGreedyAgent {
    #[must_use]
    pub fn new(seed: u64, schedule: EpsilonSchedule) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            random: RandomAgent::new(seed.wrapping_add(1)),
            epsilon: clamp_probability(schedule.start),
            schedule,
        }
    }

    /// Current probability of a greedy choice.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Agent for EpsilonGreedyAgent {
    fn name(&self) -> &'static str {
        "epsilon"
    }

    fn choose_action(&mut self, observation: &Observation) -> Direction {
        if self.rng.random_bool(self.epsilon) {
            GreedyAgent::new().choose_action(observation)
        } else {
            self.random.choose_action(observation)
        }
    }

    fn observe(&mut self, _transition: &Transition) {
        let next = (self.epsilon + self.schedule.increment).min(self.schedule.max);
        self.epsilon = clamp_probability(next);
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use oxid2048_engine::{EngineConfig, FEATURE_COUNT, GridEngine, TileSeed};

    use super::*;

    fn grid(rows: [[u32; 4]; 4]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_greedy_prefers_largest_merge() {
        let g = grid([[2, 2, 0, 0], [0, 0, 0, 0], [16, 0, 0, 0], [16, 0, 0, 0]]);
        // Up/Down merge the 16s (32 points), Left/Right only the 2s (4 points).
        assert_eq!(GreedyAgent::best_direction(&g), Direction::Up);
    }

    #[test]
    fn test_greedy_breaks_ties_by_empty_cells_then_index() {
        let g = grid([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        // No merges anywhere; Right and Down both change the grid and leave
        // the same number of empty cells, so the lower index (Right) wins.
        assert_eq!(GreedyAgent::best_direction(&g), Direction::Right);
    }

    #[test]
    fn test_greedy_skips_unchanged_directions() {
        let g = grid([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(GreedyAgent::best_direction(&g), Direction::Down);
    }

    #[test]
    fn test_greedy_on_terminal_grid_returns_up() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(GreedyAgent::best_direction(&g), Direction::Up);
    }

    #[test]
    fn test_greedy_reads_observation() {
        let engine = GridEngine::from_grid(
            grid([[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 8, 8], [0, 0, 0, 0]]),
            TileSeed::from_u128(0),
            EngineConfig::default(),
        );
        let mut agent = GreedyAgent::new();
        assert_eq!(agent.choose_action(&engine.observation()), Direction::Right);
    }

    #[test]
    fn test_random_agent_is_deterministic_and_covers_actions() {
        let observation = GridEngine::with_seed(TileSeed::from_u128(0)).observation();
        let mut a = RandomAgent::new(9);
        let mut b = RandomAgent::new(9);
        let mut seen = [false; ACTION_COUNT];
        for _ in 0..200 {
            let action = a.choose_action(&observation);
            assert_eq!(action, b.choose_action(&observation));
            seen[action.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_epsilon_grows_to_cap() {
        let schedule = EpsilonSchedule {
            start: 0.5,
            max: 0.6,
            increment: 0.04,
        };
        let mut agent = EpsilonGreedyAgent::new(1, schedule);
        let observation = GridEngine::with_seed(TileSeed::from_u128(0)).observation();
        let transition = Transition {
            observation,
            action: Direction::Up,
            reward: 0.0,
            next_observation: observation,
            done: false,
        };
        agent.observe(&transition);
        assert!((agent.epsilon() - 0.54).abs() < 1e-9);
        for _ in 0..10 {
            agent.observe(&transition);
        }
        assert!((agent.epsilon() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_epsilon_stays_a_probability() {
        let observation = GridEngine::with_seed(TileSeed::from_u128(0)).observation();
        let transition = Transition {
            observation,
            action: Direction::Up,
            reward: 0.0,
            next_observation: observation,
            done: false,
        };
        let schedules = [
            (-0.5, -1.0, 0.1),
            (0.5, 0.9, -0.3),
            (f64::NAN, 0.99, 1e-5),
            (0.5, 0.99, f64::NAN),
            (2.0, 5.0, 1.0),
        ];
        for (start, max, increment) in schedules {
            let schedule = EpsilonSchedule {
                start,
                max,
                increment,
            };
            let mut agent = EpsilonGreedyAgent::new(5, schedule);
            assert!((0.0..=1.0).contains(&agent.epsilon()), "{schedule:?}");
            for _ in 0..5 {
                agent.choose_action(&observation);
                agent.observe(&transition);
                assert!((0.0..=1.0).contains(&agent.epsilon()), "{schedule:?}");
            }
        }
    }

    #[test]
    fn test_greedy_falls_back_to_up_on_undecodable_observation() {
        let mut values = [0.0_f32; FEATURE_COUNT];
        values[5] = 10.0;
        let observation: Observation = serde_json::from_value(serde_json::json!(values)).unwrap();
        assert!(observation.to_grid().is_err());
        assert_eq!(GreedyAgent::new().choose_action(&observation), Direction::Up);
    }

    #[test]
    fn test_full_epsilon_is_greedy() {
        let schedule = EpsilonSchedule {
            start: 1.0,
            max: 1.0,
            increment: 0.0,
        };
        let mut agent = EpsilonGreedyAgent::new(3, schedule);
        let g = grid([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        let observation = Observation::from(&g);
        for _ in 0..20 {
            assert_eq!(agent.choose_action(&observation), Direction::Down);
        }
    }

    #[test]
    fn test_agent_kind_parse_and_build() {
        assert_eq!("greedy".parse::<AgentKind>().unwrap(), AgentKind::Greedy);
        assert_eq!("Random".parse::<AgentKind>().unwrap(), AgentKind::Random);
        assert!("sarsa".parse::<AgentKind>().is_err());
        assert_eq!(AgentKind::Epsilon.build(0).name(), "epsilon");
        assert_eq!(AgentKind::Epsilon.to_string(), "epsilon");
    }
}
