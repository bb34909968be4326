use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Grid, InvalidConfigError};

/// Default chance, in percent, that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_PROBABILITY: u32 = 10;

/// Tunable parameters of a [`GridEngine`](crate::GridEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    four_probability: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration where `four_probability` percent of spawned tiles are 4s.
    pub const fn new(four_probability: u32) -> Result<Self, InvalidConfigError> {
        if four_probability > 100 {
            return Err(InvalidConfigError { four_probability });
        }
        Ok(Self { four_probability })
    }

    #[must_use]
    pub const fn four_probability(&self) -> u32 {
        self.four_probability
    }
}

/// Seed for deterministic tile spawning.
///
/// A 128-bit seed serialized as a 32-character hex string. Two engines built
/// from the same seed and fed the same directions produce identical games.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{GridEngine, TileSeed};
/// use rand::Rng as _;
///
/// let seed: TileSeed = rand::rng().random();
/// let a = GridEngine::with_seed(seed);
/// let b = GridEngine::with_seed(seed);
/// assert_eq!(a.grid(), b.grid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSeed([u8; 16]);

impl TileSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Derives the seed of the `n`-th episode in a run started from `self`.
    #[must_use]
    pub fn offset(self, n: u64) -> Self {
        Self::from_u128(self.to_u128().wrapping_add(u128::from(n)))
    }
}

impl Serialize for TileSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{:032x}", self.to_u128()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for TileSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for TileSeed {
    type Err = String;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self::from_u128(num))
    }
}

impl std::fmt::Display for TileSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.to_u128())
    }
}

/// Allows generating random `TileSeed` values with `rng.random()`.
impl Distribution<TileSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TileSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TileSeed(seed)
    }
}

/// A tile placed by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Places random tiles into empty cells.
///
/// Each spawn makes two draws from the generator, always in this order:
///
/// 1. A position `r` uniform in `1..=N`, where `N` is the number of empty
///    cells; the target is the `r`-th empty cell in row-major order.
/// 2. A roll uniform in `1..=100`; a roll `<= four_probability` spawns a 4,
///    anything else a 2.
///
/// A full grid draws nothing and spawns nothing.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg32,
    seed: TileSeed,
    four_probability: u32,
}

impl TileSpawner {
    #[must_use]
    pub fn new(seed: TileSeed, config: EngineConfig) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            seed,
            four_probability: config.four_probability,
        }
    }

    /// Returns the seed the generator was created from.
    #[must_use]
    pub const fn seed(&self) -> TileSeed {
        self.seed
    }

    /// Spawns one tile into `grid`, returning where it landed.
    ///
    /// Returns `None` without consuming randomness if the grid is full.
    pub fn spawn(&mut self, grid: &mut Grid) -> Option<Spawn> {
        let empty_count = grid.empty_count();
        if empty_count == 0 {
            return None;
        }
        let position = self.rng.random_range(1..=empty_count);
        let (row, col) = grid.empty_cells().nth(position - 1)?;
        let roll = self.rng.random_range(1..=100);
        let value = if roll <= self.four_probability { 4 } else { 2 };
        grid.set_cell(row, col, value);
        Some(Spawn { row, col, value })
    }
}
