//! Recorded operations.
//!
//! An [`Operation`] is one immutable event of a run: a comparison, an exchange,
//! an overwrite, or a highlight-only mark. The kind fixes the shape of the
//! positions and payload; shapes are checked once, when the operation is built,
//! so replay never sees an operation it cannot interpret.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::{ReplayError, Result};

/// Array positions touched by an operation.
pub type Positions = SmallVec<[usize; 2]>;

/// Closed set of operation tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Marks the element currently being placed.
    Key,
    /// Compares two positions.
    Compare,
    /// Exchanges two positions.
    Swap,
    /// Writes a value while shifting a run of elements.
    Shift,
    /// Overwrites one position.
    Set,
    /// Marks the pivot element.
    Pivot,
    /// Marks an inclusive range being merged.
    MergeMark,
    /// Compares two positions during a merge.
    MergeCompare,
    /// Marks a position as final.
    Confirm,
}

impl OpKind {
    pub const ALL: [OpKind; 9] = [
        OpKind::Key,
        OpKind::Compare,
        OpKind::Swap,
        OpKind::Shift,
        OpKind::Set,
        OpKind::Pivot,
        OpKind::MergeMark,
        OpKind::MergeCompare,
        OpKind::Confirm,
    ];

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Key => "key",
            OpKind::Compare => "compare",
            OpKind::Swap => "swap",
            OpKind::Shift => "shift",
            OpKind::Set => "set",
            OpKind::Pivot => "pivot",
            OpKind::MergeMark => "merge_mark",
            OpKind::MergeCompare => "merge_compare",
            OpKind::Confirm => "confirm",
        }
    }

    /// Parse a serialized kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Whether applying this kind can change array values.
    pub fn mutates(self) -> bool {
        matches!(self, OpKind::Swap | OpKind::Shift | OpKind::Set)
    }

    fn shape(self) -> Shape {
        use PayloadRule::*;
        match self {
            OpKind::Key => Shape::new(0, 1, OptionalScalar),
            OpKind::Compare => Shape::new(2, 2, Forbidden),
            OpKind::Swap => Shape::new(2, 2, OptionalPair),
            OpKind::Shift | OpKind::Set => Shape::new(1, 1, RequiredScalar),
            OpKind::Pivot => Shape::new(1, 1, OptionalScalar),
            OpKind::MergeMark => Shape::new(2, 2, Forbidden),
            OpKind::MergeCompare => Shape::new(2, 2, OptionalScalar),
            OpKind::Confirm => Shape::new(1, 1, Forbidden),
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary data attached to an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Scalar(i64),
    Pair([i64; 2]),
}

impl Payload {
    /// The payload as a single value, if it is one.
    pub fn as_scalar(&self) -> Option<i64> {
        match self {
            Payload::Scalar(value) => Some(*value),
            Payload::Pair(_) => None,
        }
    }
}

#[derive(Clone, Copy)]
enum PayloadRule {
    Forbidden,
    OptionalScalar,
    RequiredScalar,
    OptionalPair,
}

#[derive(Clone, Copy)]
struct Shape {
    min_positions: usize,
    max_positions: usize,
    payload: PayloadRule,
}

impl Shape {
    const fn new(min_positions: usize, max_positions: usize, payload: PayloadRule) -> Self {
        Self {
            min_positions,
            max_positions,
            payload,
        }
    }
}

/// One immutable recorded event of a run.
///
/// Fields are private: the only way to obtain an `Operation` is through a
/// constructor that validates the kind's shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOperation", into = "RawOperation")]
pub struct Operation {
    kind: OpKind,
    positions: Positions,
    payload: Option<Payload>,
}

impl Operation {
    /// Build an operation, rejecting positions or payloads that do not fit `kind`.
    pub fn new(
        kind: OpKind,
        positions: impl IntoIterator<Item = usize>,
        payload: Option<Payload>,
    ) -> Result<Self> {
        let positions: Positions = positions.into_iter().collect();
        let shape = kind.shape();

        if positions.len() < shape.min_positions || positions.len() > shape.max_positions {
            let expected = if shape.min_positions == shape.max_positions {
                shape.min_positions.to_string()
            } else {
                format!("{}..={}", shape.min_positions, shape.max_positions)
            };
            return Err(ReplayError::malformed(
                kind,
                format!("expected {expected} positions, got {}", positions.len()),
            ));
        }

        match (shape.payload, payload) {
            (PayloadRule::Forbidden, Some(_)) => {
                return Err(ReplayError::malformed(kind, "payload is not allowed"));
            }
            (PayloadRule::RequiredScalar, None) => {
                return Err(ReplayError::malformed(kind, "a scalar payload is required"));
            }
            (PayloadRule::OptionalScalar | PayloadRule::RequiredScalar, Some(Payload::Pair(_))) => {
                return Err(ReplayError::malformed(kind, "payload must be a scalar"));
            }
            (PayloadRule::OptionalPair, Some(Payload::Scalar(_))) => {
                return Err(ReplayError::malformed(kind, "payload must be a pair"));
            }
            _ => {}
        }

        if kind == OpKind::MergeMark && positions[0] > positions[1] {
            return Err(ReplayError::malformed(
                kind,
                format!("range start {} is after end {}", positions[0], positions[1]),
            ));
        }

        Ok(Self {
            kind,
            positions,
            payload,
        })
    }

    /// Compare positions `i` and `j`.
    pub fn compare(i: usize, j: usize) -> Self {
        Self::trusted(OpKind::Compare, [i, j], None)
    }

    /// An exchange of `i` and `j` carrying the values before the exchange.
    pub fn swap(i: usize, j: usize, values: [i64; 2]) -> Self {
        Self::trusted(OpKind::Swap, [i, j], Some(Payload::Pair(values)))
    }

    /// Write `value` to `index`.
    pub fn set(index: usize, value: i64) -> Self {
        Self::trusted(OpKind::Set, [index], Some(Payload::Scalar(value)))
    }

    /// Shift `value` into `index`.
    pub fn shift(index: usize, value: i64) -> Self {
        Self::trusted(OpKind::Shift, [index], Some(Payload::Scalar(value)))
    }

    /// Highlight `value` at `index` as the key.
    pub fn key(index: usize, value: i64) -> Self {
        Self::trusted(OpKind::Key, [index], Some(Payload::Scalar(value)))
    }

    /// Clears the key highlight.
    pub fn clear_key() -> Self {
        Self::trusted(OpKind::Key, [], None)
    }

    /// Mark the pivot.
    pub fn pivot(index: usize) -> Self {
        Self::trusted(OpKind::Pivot, [index], None)
    }

    /// Highlight the inclusive merge range `[lo, hi]`.
    pub fn merge_mark(lo: usize, hi: usize) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        Self::trusted(OpKind::MergeMark, [lo, hi], None)
    }

    /// Compare during a merge, writing into `dest`.
    pub fn merge_compare(i: usize, j: usize, dest: usize) -> Self {
        Self::trusted(
            OpKind::MergeCompare,
            [i, j],
            Some(Payload::Scalar(dest as i64)),
        )
    }

    /// Mark `index` as final.
    pub fn confirm(index: usize) -> Self {
        Self::trusted(OpKind::Confirm, [index], None)
    }

    /// Constructor for shapes that are correct by construction.
    fn trusted<const N: usize>(kind: OpKind, positions: [usize; N], payload: Option<Payload>) -> Self {
        Self {
            kind,
            positions: positions.into_iter().collect(),
            payload,
        }
    }

    /// The operation's kind.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Positions the operation acts on.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Optional payload.
    pub fn payload(&self) -> Option<Payload> {
        self.payload
    }

    /// Short human-readable description, e.g. `swap [1, 3] -> [5, 2]`.
    pub fn describe(&self) -> String {
        let mut text = format!("{} {:?}", self.kind, self.positions.as_slice());
        match self.payload {
            Some(Payload::Scalar(value)) => text.push_str(&format!(" -> {value}")),
            Some(Payload::Pair(pair)) => text.push_str(&format!(" -> {pair:?}")),
            None => {}
        }
        text
    }
}

/// Wire form of an operation: `{ kind, positions, payload }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawOperation {
    pub kind: OpKind,
    pub positions: Vec<usize>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl TryFrom<RawOperation> for Operation {
    type Error = ReplayError;

    fn try_from(raw: RawOperation) -> Result<Self> {
        Operation::new(raw.kind, raw.positions, raw.payload)
    }
}

impl From<Operation> for RawOperation {
    fn from(op: Operation) -> Self {
        Self {
            kind: op.kind,
            positions: op.positions.into_vec(),
            payload: op.payload,
        }
    }
}
