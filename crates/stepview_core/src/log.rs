//! Append-only operation log.

use std::ops::Range;

use crate::error::{ReplayError, Result};
use crate::operation::Operation;

/// Ordered, 0-indexed, append-only sequence of operations for one run.
///
/// Nothing can be removed or altered once appended; the only way to shrink
/// the log is [`OperationLog::clear`], which discards the whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationLog {
    operations: Vec<Operation>,
}

impl OperationLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty log with room for `capacity` operations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Append an operation and return its index.
    pub fn append(&mut self, op: Operation) -> usize {
        self.operations.push(op);
        self.operations.len() - 1
    }

    /// The operation at `index`.
    pub fn get(&self, index: usize) -> Result<&Operation> {
        self.operations
            .get(index)
            .ok_or(ReplayError::IndexOutOfRange {
                index,
                len: self.operations.len(),
            })
    }

    /// Operations in `[range.start, range.end)`.
    pub fn range(&self, range: Range<usize>) -> Result<&[Operation]> {
        let len = self.operations.len();
        if range.end > len {
            return Err(ReplayError::IndexOutOfRange {
                index: range.end,
                len,
            });
        }
        if range.start > range.end {
            return Err(ReplayError::IndexOutOfRange {
                index: range.start,
                len: range.end,
            });
        }
        Ok(&self.operations[range])
    }

    /// Number of operations appended.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations in append order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// All operations as a slice.
    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    /// Discard the run.
    pub fn clear(&mut self) {
        self.operations.clear();
    }
}

impl FromIterator<Operation> for OperationLog {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut log = OperationLog::new();
        assert!(log.is_empty());

        assert_eq!(log.append(Operation::compare(0, 1)), 0);
        assert_eq!(log.append(Operation::swap(0, 1, [2, 1])), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(1).unwrap(), &Operation::swap(0, 1, [2, 1]));
    }

    #[test]
    fn test_get_out_of_range() {
        let mut log = OperationLog::new();
        log.append(Operation::compare(0, 1));

        assert_eq!(
            log.get(1),
            Err(ReplayError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_range_bounds() {
        let log: OperationLog = (0..4).map(Operation::confirm).collect();

        assert_eq!(log.range(1..3).unwrap().len(), 2);
        assert_eq!(log.range(4..4).unwrap().len(), 0);
        assert!(log.range(2..5).is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = log.range(3..1);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_clear() {
        let mut log: OperationLog = (0..3).map(Operation::confirm).collect();
        log.clear();
        assert_eq!(log.len(), 0);
    }
}
