//! Serialized run traces.
//!
//! A trace is the initial array plus the operation log. It carries enough to
//! reconstruct any state of the run with the replay engine and nothing that
//! depends on the host (no timings).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::log::OperationLog;
use crate::operation::Operation;
use crate::replay::{self, Reconstruction};
use crate::state::ReplayState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub initial: Vec<i64>,
    pub operations: Vec<Operation>,
}

impl Trace {
    /// A trace of `operations` starting from `initial`.
    pub fn new(initial: Vec<i64>, operations: Vec<Operation>) -> Self {
        Self {
            initial,
            operations,
        }
    }

    /// Capture a recorded run.
    pub fn from_log(initial: &ReplayState, log: &OperationLog) -> Self {
        Self {
            initial: initial.values().to_vec(),
            operations: log.as_slice().to_vec(),
        }
    }

    /// Rebuild an operation log from the trace.
    pub fn to_log(&self) -> OperationLog {
        self.operations.iter().cloned().collect()
    }

    /// Reconstruct the state after the first `index` operations.
    pub fn replay_to(&self, index: usize) -> Result<Reconstruction> {
        replay::reconstruct(
            &ReplayState::new(self.initial.clone()),
            &self.to_log(),
            0,
            index,
        )
    }

    /// Reconstruct the final state.
    pub fn replay(&self) -> Result<Reconstruction> {
        replay::replay_slice(&ReplayState::new(self.initial.clone()), &self.operations)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a trace, validating every operation's shape.
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Trace {
        Trace::new(
            vec![3, 1, 2],
            vec![
                Operation::compare(0, 1),
                Operation::swap(0, 1, [3, 1]),
                Operation::compare(1, 2),
                Operation::swap(1, 2, [3, 2]),
                Operation::merge_compare(0, 1, 0),
                Operation::set(0, 1),
                Operation::confirm(0),
            ],
        )
    }

    #[test]
    fn test_json_reconstructs_the_same_run() {
        let trace = sample();
        let parsed = Trace::from_json(&trace.to_json().unwrap()).unwrap();

        assert_eq!(parsed, trace);
        assert_eq!(parsed.replay().unwrap(), trace.replay().unwrap());
        assert_eq!(parsed.replay().unwrap().state.values(), &[1, 2, 3]);
    }

    #[test]
    fn test_rejects_malformed_operation() {
        let input = r#"{"initial":[1,2],"operations":[{"kind":"set","positions":[0]}]}"#;
        assert!(Trace::from_json(input).is_err());
    }

    #[test]
    fn test_replay_to_prefix() {
        let trace = sample();
        let out = trace.replay_to(2).unwrap();
        assert_eq!(out.state.values(), &[1, 3, 2]);
        assert_eq!(out.metrics.swaps, 1);
        assert!(trace.replay_to(99).is_err());
    }
}
