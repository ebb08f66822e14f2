//! Capability flags for a source/player pairing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional features a run may or may not support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Retreating one operation via the replay engine.
    StepBack,
    /// The source declares its total length up front.
    HasKnownTotalLength,
    /// Logical time is a pure function of operation count.
    TrueTime,
    /// The run can be detached from its consumer.
    Detach,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::StepBack,
        Capability::HasKnownTotalLength,
        Capability::TrueTime,
        Capability::Detach,
    ];

    /// Stable key used in logs and config.
    pub fn name(self) -> &'static str {
        match self {
            Capability::StepBack => "step_back",
            Capability::HasKnownTotalLength => "has_known_total_length",
            Capability::TrueTime => "true_time",
            Capability::Detach => "detach",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named boolean flags. Unset capabilities read as unsupported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMap {
    flags: FxHashMap<Capability, bool>,
}

impl CapabilityMap {
    /// Empty map. Unset capabilities are unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`CapabilityMap::set`].
    pub fn with(mut self, capability: Capability, enabled: bool) -> Self {
        self.set(capability, enabled);
        self
    }

    /// Grant or deny one capability.
    pub fn set(&mut self, capability: Capability, enabled: bool) {
        self.flags.insert(capability, enabled);
    }

    /// Whether `capability` is granted.
    pub fn supports(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(false)
    }

    /// All capabilities with their current value, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        Capability::ALL
            .into_iter()
            .map(move |cap| (cap, self.supports(cap)))
    }
}
