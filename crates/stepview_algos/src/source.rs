use stepview_core::{Operation, Source, SourceError, VecSource};

/// Source over one algorithm's recorded run. The total length is known.
#[derive(Clone, Debug)]
pub struct AlgoSource {
    algo: &'static str,
    ops: VecSource,
}

impl AlgoSource {
    /// Wrap a recorded operation list.
    pub fn new(algo: &'static str, ops: Vec<Operation>) -> Self {
        Self {
            algo,
            ops: VecSource::new(ops),
        }
    }

    /// Key of the algorithm that produced the operations.
    pub fn algo(&self) -> &'static str {
        self.algo
    }
}

impl Source for AlgoSource {
    fn next_op(&mut self) -> Result<Option<Operation>, SourceError> {
        self.ops.next_op()
    }

    fn total_len(&self) -> Option<usize> {
        self.ops.total_len()
    }
}
