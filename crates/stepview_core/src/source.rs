//! Producer contract for operation streams.

use std::collections::VecDeque;

use crate::error::SourceError;
use crate::operation::Operation;

/// A finite producer of operations.
///
/// A source must be a pure function of its initial configuration: two
/// sources built from the same dataset and seed yield identical streams.
pub trait Source {
    /// Produce the next operation, `Ok(None)` once exhausted.
    fn next_op(&mut self) -> Result<Option<Operation>, SourceError>;

    /// Upper bound on the total number of operations, if known up front.
    fn total_len(&self) -> Option<usize> {
        None
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn next_op(&mut self) -> Result<Option<Operation>, SourceError> {
        (**self).next_op()
    }

    fn total_len(&self) -> Option<usize> {
        (**self).total_len()
    }
}

/// Source over a precomputed trace. Its total length is known.
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    total: usize,
    remaining: VecDeque<Operation>,
}

impl VecSource {
    /// A source yielding `ops` in order.
    pub fn new(ops: Vec<Operation>) -> Self {
        Self {
            total: ops.len(),
            remaining: ops.into(),
        }
    }
}

impl Source for VecSource {
    fn next_op(&mut self) -> Result<Option<Operation>, SourceError> {
        Ok(self.remaining.pop_front())
    }

    fn total_len(&self) -> Option<usize> {
        Some(self.total)
    }
}

/// Source over any iterator of fallible operations. Length is unknown.
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Operation, SourceError>>,
{
    /// A source pulling from `iter`.
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> IterSource<std::iter::Map<I, fn(Operation) -> Result<Operation, SourceError>>>
where
    I: Iterator<Item = Operation>,
{
    /// Wrap an infallible iterator.
    pub fn infallible(iter: I) -> Self {
        Self {
            iter: iter.map(Ok as fn(Operation) -> Result<Operation, SourceError>),
        }
    }
}

impl<I> Source for IterSource<I>
where
    I: Iterator<Item = Result<Operation, SourceError>>,
{
    fn next_op(&mut self) -> Result<Option<Operation>, SourceError> {
        self.iter.next().transpose()
    }
}
