//! Seeded dataset presets.
//!
//! Every preset draws from a `ChaCha8Rng` seeded with the caller's seed, so a
//! given `(preset, n, min, max, seed)` produces the same dataset on every
//! platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{AlgoError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Random,
    NearlySorted,
    ReverseSorted,
    ReverseRun,
    FewUnique,
    Sorted,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Random,
        Preset::NearlySorted,
        Preset::ReverseSorted,
        Preset::ReverseRun,
        Preset::FewUnique,
        Preset::Sorted,
    ];

    /// Config and CLI key.
    pub fn key(self) -> &'static str {
        match self {
            Preset::Random => "random",
            Preset::NearlySorted => "nearly_sorted",
            Preset::ReverseSorted => "reverse_sorted",
            Preset::ReverseRun => "reverse_run",
            Preset::FewUnique => "few_unique",
            Preset::Sorted => "sorted",
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Preset::Random => "Random (uniform)",
            Preset::NearlySorted => "Nearly sorted",
            Preset::ReverseSorted => "Reverse sorted",
            Preset::ReverseRun => "Reverse run",
            Preset::FewUnique => "Few unique",
            Preset::Sorted => "Sorted ascending",
        }
    }

    /// One-line description of the shape of the data.
    pub fn description(self) -> &'static str {
        match self {
            Preset::Random => "Each element drawn independently from the value range.",
            Preset::NearlySorted => "Ascending order with a handful of random swaps.",
            Preset::ReverseSorted => "Descending order.",
            Preset::ReverseRun => "Descending order with one sub-run flipped to ascending.",
            Preset::FewUnique => "At most five distinct values, heavy on duplicates.",
            Preset::Sorted => "Ascending order; best case for adaptive algorithms.",
        }
    }

    /// Generate `n` values in `[min, max]`.
    pub fn generate(self, n: usize, min: i64, max: i64, seed: u64) -> Result<Vec<i64>> {
        if min > max {
            return Err(AlgoError::InvalidRange { min, max });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data = match self {
            Preset::Random => uniform(&mut rng, n, min, max),
            Preset::Sorted => ascending(&mut rng, n, min, max),
            Preset::ReverseSorted => descending(&mut rng, n, min, max),
            Preset::NearlySorted => {
                let mut data = ascending(&mut rng, n, min, max);
                for _ in 0..(n / 8).max(1) {
                    let i = rng.gen_range(0..n);
                    let j = rng.gen_range(0..n);
                    data.swap(i, j);
                }
                data
            }
            Preset::ReverseRun => {
                let mut data = descending(&mut rng, n, min, max);
                let run = (n / 6).max(2);
                let start = rng.gen_range(0..n.saturating_sub(run).max(1));
                let end = (start + run).min(n);
                data[start..end].reverse();
                data
            }
            Preset::FewUnique => {
                let span = i128::from(max) - i128::from(min) + 1;
                let target = span.min(5) as usize;
                let mut pool = BTreeSet::new();
                while pool.len() < target {
                    pool.insert(rng.gen_range(min..=max));
                }
                let choices: Vec<i64> = pool.into_iter().collect();
                (0..n)
                    .map(|_| choices[rng.gen_range(0..choices.len())])
                    .collect()
            }
        };

        tracing::debug!(preset = self.key(), n, min, max, seed, "dataset generated");
        Ok(data)
    }
}

fn uniform(rng: &mut ChaCha8Rng, n: usize, min: i64, max: i64) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(min..=max)).collect()
}

fn ascending(rng: &mut ChaCha8Rng, n: usize, min: i64, max: i64) -> Vec<i64> {
    let mut data = uniform(rng, n, min, max);
    data.sort_unstable();
    data
}

fn descending(rng: &mut ChaCha8Rng, n: usize, min: i64, max: i64) -> Vec<i64> {
    let mut data = ascending(rng, n, min, max);
    data.reverse();
    data
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preset {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.key() == s)
            .ok_or_else(|| AlgoError::UnknownPreset(s.to_string()))
    }
}
