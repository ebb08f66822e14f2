//! Reconstructed run state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Add, AddAssign};

/// Running counters derived from a log prefix.
///
/// `confirms` is kept apart from the comparison and swap counts so the
/// terminal confirm sweep never inflates algorithm metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metrics {
    pub comparisons: u64,
    pub swaps: u64,
    pub confirms: u64,
}

impl Metrics {
    /// Counters with no confirms.
    pub fn new(comparisons: u64, swaps: u64) -> Self {
        Self {
            comparisons,
            swaps,
            confirms: 0,
        }
    }
}

impl Add for Metrics {
    type Output = Metrics;

    fn add(self, rhs: Metrics) -> Metrics {
        Metrics {
            comparisons: self.comparisons + rhs.comparisons,
            swaps: self.swaps + rhs.swaps,
            confirms: self.confirms + rhs.confirms,
        }
    }
}

impl AddAssign for Metrics {
    fn add_assign(&mut self, rhs: Metrics) {
        *self = *self + rhs;
    }
}

/// Positions most recently touched by each highlight-carrying kind.
///
/// Highlights are a deterministic function of the log prefix just like the
/// array values, so they are part of every snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlights {
    pub compare: SmallVec<[usize; 2]>,
    pub swap: SmallVec<[usize; 2]>,
    pub pivot: Option<usize>,
    /// Inclusive merge range, or the destination slot of a merge compare.
    pub merge: Option<(usize, usize)>,
    pub key: Option<usize>,
    pub shift: Option<usize>,
    /// Confirmed positions in confirmation order.
    pub confirmed: Vec<usize>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Array contents plus highlights at some log index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayState {
    values: Vec<i64>,
    highlights: Highlights,
}

impl ReplayState {
    /// Initial state of a run over `values`.
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            highlights: Highlights::default(),
        }
    }

    /// Array values.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Highlights after the last applied operation.
    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<i64> {
        self.values
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<i64>, &mut Highlights) {
        (&mut self.values, &mut self.highlights)
    }
}

impl From<Vec<i64>> for ReplayState {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}
