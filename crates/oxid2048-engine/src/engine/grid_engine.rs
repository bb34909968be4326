use arrayvec::ArrayVec;
use rand::Rng as _;

use crate::{Direction, Grid};

use super::{
    game_stats::GameStats,
    tile_spawner::{EngineConfig, Spawn, TileSeed, TileSpawner},
};

/// Result of requesting a move.
///
/// An unchanged grid is a normal outcome, not an error: the UI redraws the
/// same state and the trainer turns it into a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// At least one cell changed; a tile was spawned and the round advanced.
    Moved {
        score_gained: u64,
        merges: u32,
        spawn: Option<Spawn>,
    },
    /// No cell changed; grid, score and round are untouched.
    Unchanged,
}

impl MoveOutcome {
    /// Returns the score gained by merges, `0` for an unchanged move.
    #[must_use]
    pub const fn score_gained(&self) -> u64 {
        match self {
            Self::Moved { score_gained, .. } => *score_gained,
            Self::Unchanged => 0,
        }
    }
}

/// A single game of 2048: the grid, its statistics and the tile spawner.
///
/// The engine is a synchronous state machine. A new engine is seeded with
/// two random tiles; every successful [`slide`](Self::slide) replaces the
/// grid, spawns one tile and advances the round.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Direction, EngineConfig, Grid, GridEngine, TileSeed};
///
/// let grid = Grid::from_rows([
///     [2, 2, 2, 2],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
///     [0, 0, 0, 0],
/// ])
/// .unwrap();
/// let mut engine = GridEngine::from_grid(grid, TileSeed::from_u128(1), EngineConfig::default());
///
/// let outcome = engine.slide(Direction::Left);
/// assert!(outcome.is_moved());
/// assert_eq!(engine.score(), 8);
/// assert_eq!(engine.round(), 1);
/// assert_eq!(engine.grid().tile_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GridEngine {
    grid: Grid,
    stats: GameStats,
    spawner: TileSpawner,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GridEngine {
    /// Creates a new game with a random seed and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic play.
    #[must_use]
    pub fn with_seed(seed: TileSeed) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(seed: TileSeed, config: EngineConfig) -> Self {
        let mut engine = Self {
            grid: Grid::EMPTY,
            stats: GameStats::new(),
            spawner: TileSpawner::new(seed, config),
        };
        engine.reset();
        engine
    }

    /// Starts from an existing grid without spawning any tile.
    ///
    /// Score and round start at zero.
    #[must_use]
    pub fn from_grid(grid: Grid, seed: TileSeed, config: EngineConfig) -> Self {
        let mut stats = GameStats::new();
        stats.observe_tile(grid.max_tile());
        Self {
            grid,
            stats,
            spawner: TileSpawner::new(seed, config),
        }
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub const fn round(&self) -> u64 {
        self.stats.round()
    }

    /// Returns the seed the tile spawner was last seeded with.
    #[must_use]
    pub const fn seed(&self) -> TileSeed {
        self.spawner.seed()
    }

    /// Clears the grid, zeroes score and round, and spawns two tiles.
    ///
    /// The random stream continues from where the previous game left it.
    pub fn reset(&mut self) {
        self.grid = Grid::EMPTY;
        self.stats = GameStats::new();
        for _ in 0..2 {
            if let Some(spawn) = self.spawner.spawn(&mut self.grid) {
                self.stats.observe_tile(spawn.value);
            }
        }
    }

    /// Reseeds the tile spawner, then resets the game.
    ///
    /// An engine reset this way plays exactly like `GridEngine::with_config(seed, ..)`.
    pub fn reset_with_seed(&mut self, seed: TileSeed, config: EngineConfig) {
        self.spawner = TileSpawner::new(seed, config);
        self.reset();
    }

    /// Moves all tiles toward `direction`.
    ///
    /// Every line is compacted and merged toward the leading edge. If the
    /// resulting grid differs from the current one in any cell, it replaces
    /// the grid, one tile is spawned and the round advances. Otherwise
    /// nothing changes and [`MoveOutcome::Unchanged`] is returned.
    pub fn slide(&mut self, direction: Direction) -> MoveOutcome {
        let slide = self.grid.slid(direction);
        if slide.grid == self.grid {
            return MoveOutcome::Unchanged;
        }

        self.grid = slide.grid;
        let spawn = self.spawner.spawn(&mut self.grid);
        self.stats
            .complete_move(slide.score_gained, slide.merges, self.grid.max_tile());
        MoveOutcome::Moved {
            score_gained: slide.score_gained,
            merges: slide.merges,
            spawn,
        }
    }

    /// Returns `true` if no direction can change the grid.
    ///
    /// Derived from the current grid on every call.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.grid.is_terminal()
    }

    /// Returns the directions that would change the grid, in action-index order.
    #[must_use]
    pub fn legal_directions(&self) -> ArrayVec<Direction, { Direction::LEN }> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.grid.slid(d).grid != self.grid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_from(rows: [[u32; 4]; 4]) -> GridEngine {
        GridEngine::from_grid(
            Grid::from_rows(rows).unwrap(),
            TileSeed::from_u128(0xdead_beef),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        for seed in 0..32 {
            let engine = GridEngine::with_seed(TileSeed::from_u128(seed));
            assert_eq!(engine.grid().tile_count(), 2);
            assert_eq!(engine.score(), 0);
            assert_eq!(engine.round(), 0);
            assert!(engine.grid().cells().iter().all(|&v| matches!(v, 0 | 2 | 4)));
        }
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut engine = GridEngine::with_seed(TileSeed::from_u128(11));
        for direction in Direction::ALL.into_iter().cycle().take(40) {
            engine.slide(direction);
        }
        assert!(engine.round() > 0);
        engine.reset();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round(), 0);
        assert_eq!(engine.grid().tile_count(), 2);
    }

    #[test]
    fn test_merge_semantics_and_score() {
        let mut engine = engine_from([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let outcome = engine.slide(Direction::Left);
        assert_eq!(outcome.score_gained(), 8);
        assert_eq!(engine.grid().row(0)[..2], [4, 4]);
        assert_eq!(engine.score(), 8);
        assert_eq!(engine.stats().merges(), 2);
    }

    #[test]
    fn test_failed_move_is_idempotent() {
        let mut engine = engine_from([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        let before = *engine.grid();
        assert!(engine.slide(Direction::Left).is_unchanged());
        assert!(engine.slide(Direction::Left).is_unchanged());
        assert_eq!(*engine.grid(), before);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.round(), 0);
    }

    #[test]
    fn test_second_identical_move_fails_when_no_left_move_remains() {
        // Rows 1-3 are full with no equal neighbours. After the first Left,
        // the only empty cell is (0, 3); a 2 or 4 there cannot sit next to
        // an equal tile or leave a gap, so Left is exhausted.
        let mut engine = engine_from([
            [0, 2, 4, 8],
            [2, 4, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
        ]);
        assert!(engine.slide(Direction::Left).is_moved());
        assert_eq!(engine.grid().row(0)[..3], [2, 4, 8]);
        let after_first = *engine.grid();

        assert!(engine.slide(Direction::Left).is_unchanged());
        assert_eq!(*engine.grid(), after_first);
        assert_eq!(engine.round(), 1);
    }

    #[test]
    fn test_largest_tiles_do_not_overflow() {
        let mut engine = engine_from([[1 << 31, 1 << 31, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(engine.slide(Direction::Left).is_unchanged());
        assert_eq!(engine.score(), 0);

        let mut engine = engine_from([[1 << 30; 4], [0; 4], [0; 4], [0; 4]]);
        let outcome = engine.slide(Direction::Left);
        assert_eq!(outcome.score_gained(), 1 << 32);
        assert_eq!(engine.score(), 1 << 32);
        assert_eq!(engine.grid().row(0)[..2], [1 << 31, 1 << 31]);
        // The capped pair stays apart and a lone spawned tile has nothing to merge with.
        let step = engine.step(Direction::Left);
        assert_eq!(step.score_gained, 0);
    }

    #[test]
    fn test_successful_move_adds_exactly_one_tile() {
        let mut engine = GridEngine::with_seed(TileSeed::from_u128(2024));
        for step in 0..500 {
            let direction = Direction::from_index(step % Direction::LEN);
            let tiles_before = engine.grid().tile_count();
            let slide = engine.grid().slid(direction);
            let tiles_after_slide = slide.grid.tile_count();
            let outcome = engine.slide(direction);
            match outcome {
                MoveOutcome::Moved { merges, spawn, .. } => {
                    assert_eq!(tiles_after_slide, tiles_before - merges as usize);
                    assert!(spawn.is_some());
                    assert_eq!(engine.grid().tile_count(), tiles_after_slide + 1);
                }
                MoveOutcome::Unchanged => {
                    assert_eq!(engine.grid().tile_count(), tiles_before);
                }
            }
            if engine.is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn test_merges_conserve_tile_sum() {
        let mut engine = GridEngine::with_seed(TileSeed::from_u128(77));
        for step in 0..300 {
            let direction = Direction::from_index((step * 7 + step / 3) % Direction::LEN);
            let sum_before = engine.grid().tile_sum();
            if let MoveOutcome::Moved {
                spawn: Some(spawn), ..
            } = engine.slide(direction)
            {
                assert_eq!(
                    engine.grid().tile_sum(),
                    sum_before + u64::from(spawn.value)
                );
            } else {
                assert_eq!(engine.grid().tile_sum(), sum_before);
            }
        }
    }

    #[test]
    fn test_score_is_monotonic_and_round_counts_moves() {
        let mut engine = GridEngine::with_seed(TileSeed::from_u128(5));
        let mut moved = 0;
        let mut last_score = 0;
        for step in 0..400 {
            if engine.slide(Direction::from_index(step % 4)).is_moved() {
                moved += 1;
            }
            assert!(engine.score() >= last_score);
            last_score = engine.score();
            assert_eq!(engine.round(), moved);
        }
    }

    #[test]
    fn test_tiles_stay_powers_of_two() {
        let mut engine = GridEngine::with_seed(TileSeed::from_u128(8));
        for step in 0..400 {
            engine.slide(Direction::from_index((step / 2) % 4));
            assert!(engine.grid().cells().iter().all(|&v| crate::is_valid_cell(v)));
        }
        assert_eq!(engine.stats().max_tile(), engine.grid().max_tile());
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed = TileSeed::from_u128(0x5eed);
        let mut a = GridEngine::with_seed(seed);
        let mut b = GridEngine::with_seed(seed);
        for step in 0..200 {
            let direction = Direction::from_index((step * 3) % 4);
            assert_eq!(a.slide(direction), b.slide(direction));
            assert_eq!(a.grid(), b.grid());
        }
    }

    #[test]
    fn test_reset_with_seed_matches_fresh_engine() {
        let seed = TileSeed::from_u128(42);
        let config = EngineConfig::new(25).unwrap();
        let mut reused = GridEngine::with_seed(TileSeed::from_u128(1));
        reused.slide(Direction::Up);
        reused.reset_with_seed(seed, config);
        let mut fresh = GridEngine::with_config(seed, config);
        assert_eq!(reused.grid(), fresh.grid());
        for direction in Direction::ALL.into_iter().cycle().take(50) {
            assert_eq!(reused.slide(direction), fresh.slide(direction));
        }
        assert_eq!(reused.seed(), seed);
    }

    #[test]
    fn test_terminal_and_legal_directions() {
        let terminal = engine_from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(terminal.is_terminal());
        assert!(terminal.legal_directions().is_empty());

        let mergeable = engine_from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 16, 16]]);
        assert!(!mergeable.is_terminal());
        assert_eq!(
            mergeable.legal_directions().as_slice(),
            &[Direction::Right, Direction::Left]
        );

        let compact_left = engine_from([[2, 4, 8, 16], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(compact_left.legal_directions().as_slice(), &[Direction::Down]);
    }

    #[test]
    fn test_move_into_full_grid_without_spawn_room_never_happens() {
        // A move that changes the grid always frees at least one cell.
        let mut engine = engine_from([
            [2, 2, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        let outcome = engine.slide(Direction::Left);
        let MoveOutcome::Moved { spawn, .. } = outcome else {
            panic!("expected a successful move");
        };
        assert!(spawn.is_some());
        assert_eq!(engine.grid().tile_count(), 16);
    }
}
