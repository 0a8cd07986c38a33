//! Reading value generators
//!
//! Every generator yields values in `[READING_MIN, READING_MAX]`; downstream
//! code relies on that range without re-checking it.

use contracts::{SourceId, READING_MAX, READING_MIN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces one density value per source tick
pub trait ReadingGenerator: Send {
    /// Next value, always within `[READING_MIN, READING_MAX]`
    fn next_value(&mut self) -> u32;
}

/// Uniformly distributed values backed by a per-source `StdRng`
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    rng: StdRng,
}

impl UniformGenerator {
    /// Create a generator for `source_id`
    ///
    /// With a base seed the stream is reproducible and distinct per source;
    /// without one the generator draws from OS entropy.
    pub fn for_source(source_id: SourceId, base_seed: Option<u64>) -> Self {
        let rng = match base_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(source_id.get()))),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl ReadingGenerator for UniformGenerator {
    fn next_value(&mut self) -> u32 {
        self.rng.random_range(READING_MIN..=READING_MAX)
    }
}

/// Replays a fixed script of values, cycling when exhausted
///
/// Values outside the valid range are clamped on construction.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedGenerator {
    /// Create a generator from a non-empty script
    ///
    /// An empty script replays `READING_MIN`.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        let mut values: Vec<u32> = values
            .into_iter()
            .map(|v| v.clamp(READING_MIN, READING_MAX))
            .collect();
        if values.is_empty() {
            values.push(READING_MIN);
        }
        Self { values, cursor: 0 }
    }
}

impl ReadingGenerator for ScriptedGenerator {
    fn next_value(&mut self) -> u32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}
