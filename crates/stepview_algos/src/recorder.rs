//! Working array that records every operation applied to it.

use std::cmp::Ordering;
use stepview_core::Operation;

/// A sort's working copy of the dataset plus the operations it has emitted.
///
/// Mutating helpers record the operation with the values it acts on and
/// then apply it, so the trace always replays to the same array.
#[derive(Clone, Debug)]
pub struct Recorder {
    values: Vec<i64>,
    ops: Vec<Operation>,
    confirmed: Vec<bool>,
}

impl Recorder {
    /// Start recording over a copy of `values`.
    pub fn new(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
            ops: Vec::new(),
            confirmed: vec![false; values.len()],
        }
    }

    /// Number of elements being sorted.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current value at `index`.
    pub fn value(&self, index: usize) -> i64 {
        self.values[index]
    }

    /// The working array as it stands.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Operations recorded so far.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Record a comparison of `i` and `j` and return how their values order.
    pub fn compare(&mut self, i: usize, j: usize) -> Ordering {
        self.ops.push(Operation::compare(i, j));
        self.values[i].cmp(&self.values[j])
    }

    /// Record a comparison whose outcome the caller decides itself.
    pub fn note_compare(&mut self, i: usize, j: usize) {
        self.ops.push(Operation::compare(i, j));
    }

    /// Record and apply an exchange of `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.ops
            .push(Operation::swap(i, j, [self.values[i], self.values[j]]));
        self.values.swap(i, j);
    }

    /// Record and apply a direct write.
    pub fn set(&mut self, index: usize, value: i64) {
        self.ops.push(Operation::set(index, value));
        self.values[index] = value;
    }

    /// Record and apply a shift of `value` into `index`.
    pub fn shift(&mut self, index: usize, value: i64) {
        self.ops.push(Operation::shift(index, value));
        self.values[index] = value;
    }

    /// Highlight the value at `index` as the current key.
    pub fn key(&mut self, index: usize) {
        self.ops.push(Operation::key(index, self.values[index]));
    }

    /// Drop the key highlight.
    pub fn clear_key(&mut self) {
        self.ops.push(Operation::clear_key());
    }

    /// Mark `index` as the partition pivot.
    pub fn pivot(&mut self, index: usize) {
        self.ops.push(Operation::pivot(index));
    }

    /// Highlight the inclusive range being merged.
    pub fn merge_mark(&mut self, lo: usize, hi: usize) {
        self.ops.push(Operation::merge_mark(lo, hi));
    }

    /// Record a merge comparison writing into `dest`.
    pub fn merge_compare(&mut self, i: usize, j: usize, dest: usize) {
        self.ops.push(Operation::merge_compare(i, j, dest));
    }

    /// Mark `index` as final. Confirming a position twice records nothing.
    pub fn confirm(&mut self, index: usize) {
        if !std::mem::replace(&mut self.confirmed[index], true) {
            self.ops.push(Operation::confirm(index));
        }
    }

    /// Terminal sweep marking every position not yet confirmed.
    pub fn confirm_all(&mut self) {
        for index in 0..self.values.len() {
            self.confirm(index);
        }
    }

    /// Final array and the full operation list.
    pub fn into_parts(self) -> (Vec<i64>, Vec<Operation>) {
        (self.values, self.ops)
    }
}
