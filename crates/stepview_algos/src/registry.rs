//! Algorithm registry.

use serde::Serialize;
use stepview_core::{Operation, Trace};

use crate::error::{AlgoError, Result};
use crate::recorder::Recorder;
use crate::sorts;
use crate::source::AlgoSource;

/// Best, average, and worst case running time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub best: &'static str,
    pub avg: &'static str,
    pub worst: &'static str,
}

impl Complexity {
    const fn new(best: &'static str, avg: &'static str, worst: &'static str) -> Self {
        Self { best, avg, worst }
    }
}

/// Metadata for a registered algorithm, plus the sort itself.
#[derive(Clone, Copy, Serialize)]
pub struct AlgoInfo {
    /// Lookup key, e.g. `bubble`.
    pub key: &'static str,
    pub name: &'static str,
    pub stable: bool,
    pub in_place: bool,
    /// Whether the sort orders by comparing elements rather than by
    /// inspecting their values.
    pub comparison: bool,
    pub complexity: Complexity,
    pub description: &'static str,
    /// Short remarks on trade-offs, shown beside the description.
    pub notes: &'static [&'static str],
    #[serde(skip)]
    sort: fn(&mut Recorder),
}

impl AlgoInfo {
    /// Run the sort over a copy of `data` and return its operations.
    pub fn record(&self, data: &[i64]) -> Vec<Operation> {
        let mut rec = Recorder::new(data);
        (self.sort)(&mut rec);
        let (_, ops) = rec.into_parts();
        tracing::trace!(algo = self.key, n = data.len(), ops = ops.len(), "recorded");
        ops
    }

    /// The recorded run paired with its initial data.
    pub fn trace(&self, data: &[i64]) -> Trace {
        Trace::new(data.to_vec(), self.record(data))
    }

    /// A source that yields this algorithm's operations over `data`.
    pub fn source(&self, data: &[i64]) -> AlgoSource {
        AlgoSource::new(self.key, self.record(data))
    }
}

impl std::fmt::Debug for AlgoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgoInfo")
            .field("key", &self.key)
            .field("stable", &self.stable)
            .field("in_place", &self.in_place)
            .field("comparison", &self.comparison)
            .field("complexity", &self.complexity)
            .finish_non_exhaustive()
    }
}

static ALGORITHMS: [AlgoInfo; 13] = [
    AlgoInfo {
        key: "bubble",
        name: "Bubble Sort",
        stable: true,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n)", "O(n^2)", "O(n^2)"),
        description: "Adjacent swaps bubble the largest values toward the end each pass, \
                      with an early exit when a pass makes no swap.",
        notes: &["Every compare and swap is visible", "Best case O(n) thanks to swap detection"],
        sort: sorts::bubble,
    },
    AlgoInfo {
        key: "cocktail",
        name: "Cocktail Shaker Sort",
        stable: true,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n)", "O(n^2)", "O(n^2)"),
        description: "Bubble sort that alternates direction, settling one element at each end per round.",
        notes: &["Moves small values left faster than bubble sort", "The sorted zone grows from both ends"],
        sort: sorts::cocktail,
    },
    AlgoInfo {
        key: "comb",
        name: "Comb Sort",
        stable: false,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n log n)", "O(n^2)", "O(n^2)"),
        description: "Bubble passes over a gap that shrinks by 1.3 each round, finishing with gap 1.",
        notes: &["Long gaps clear small values stuck near the end", "Becomes bubble sort once the gap is 1"],
        sort: sorts::comb,
    },
    AlgoInfo {
        key: "insertion",
        name: "Insertion Sort",
        stable: true,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n)", "O(n^2)", "O(n^2)"),
        description: "Grows a sorted prefix by shifting larger elements right and inserting each key.",
        notes: &["Adaptive: nearly sorted input drops to O(n)", "Used for the short runs in timsort"],
        sort: sorts::insertion,
    },
    AlgoInfo {
        key: "shell",
        name: "Shell Sort",
        stable: false,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n log n)", "O(n^2)", "O(n^2)"),
        description: "Insertion sort over gapped subsequences, halving the gap until a final pass with gap 1.",
        notes: &["Gap sequence n/2, n/4, ..., 1", "Disorder visibly shrinks with each gap"],
        sort: sorts::shell,
    },
    AlgoInfo {
        key: "selection",
        name: "Selection Sort",
        stable: false,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n^2)", "O(n^2)", "O(n^2)"),
        description: "Repeatedly selects the minimum of the unsorted suffix and swaps it into place.",
        notes: &["Always n(n-1)/2 comparisons", "At most n-1 swaps"],
        sort: sorts::selection,
    },
    AlgoInfo {
        key: "heap",
        name: "Heap Sort",
        stable: false,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n log n)", "O(n log n)", "O(n log n)"),
        description: "Builds a max-heap, then repeatedly moves the root behind the shrinking heap.",
        notes: &["Heap construction is linear", "O(n log n) even on adversarial input"],
        sort: sorts::heap,
    },
    AlgoInfo {
        key: "merge",
        name: "Merge Sort",
        stable: true,
        in_place: false,
        comparison: true,
        complexity: Complexity::new("O(n log n)", "O(n log n)", "O(n log n)"),
        description: "Bottom-up merging of doubling run widths through an auxiliary buffer.",
        notes: &["Iteration order is fixed, so replay is simple", "Copies each merge window into a buffer"],
        sort: sorts::merge,
    },
    AlgoInfo {
        key: "timsort",
        name: "Timsort",
        stable: true,
        in_place: false,
        comparison: true,
        complexity: Complexity::new("O(n)", "O(n log n)", "O(n log n)"),
        description: "Insertion-sorts runs of 32, then merges neighbouring runs of doubling width.",
        notes: &["Fixed runs rather than natural run detection", "Shows a hybrid of insertion and merge sort"],
        sort: sorts::timsort,
    },
    AlgoInfo {
        key: "quick",
        name: "Quick Sort",
        stable: false,
        in_place: true,
        comparison: true,
        complexity: Complexity::new("O(n log n)", "O(n log n)", "O(n^2)"),
        description: "Median-of-three Lomuto partitioning driven by an explicit stack.",
        notes: &["Explicit stack, no recursion", "Median-of-three pivot handles nearly sorted input"],
        sort: sorts::quick,
    },
    AlgoInfo {
        key: "counting",
        name: "Counting Sort",
        stable: true,
        in_place: false,
        comparison: false,
        complexity: Complexity::new("O(n + k)", "O(n + k)", "O(n + k)"),
        description: "Counts each value in a bounded range, then writes them back in order from prefix sums.",
        notes: &["Negative values are offset into the counts table", "Wide ranges write the sorted output directly"],
        sort: sorts::counting,
    },
    AlgoInfo {
        key: "radix_lsd",
        name: "Radix Sort LSD",
        stable: true,
        in_place: false,
        comparison: false,
        complexity: Complexity::new("O(d(n + k))", "O(d(n + k))", "O(d(n + k))"),
        description: "Stable base-10 digit passes from least to most significant.",
        notes: &["Negative values are offset before the digit passes", "One full rewrite of the array per digit"],
        sort: sorts::radix_lsd,
    },
    AlgoInfo {
        key: "bucket",
        name: "Bucket Sort",
        stable: true,
        in_place: false,
        comparison: false,
        complexity: Complexity::new("O(n)", "O(n + k)", "O(n^2)"),
        description: "Scatters values into evenly spaced buckets, sorts each, and concatenates them.",
        notes: &["Best on uniformly distributed data", "All-equal input is only confirmed"],
        sort: sorts::bucket,
    },
];

/// All registered algorithms in display order.
pub fn algorithms() -> &'static [AlgoInfo] {
    &ALGORITHMS
}

/// Find an algorithm by key or, ignoring case, by display name.
pub fn lookup(key: &str) -> Result<&'static AlgoInfo> {
    ALGORITHMS
        .iter()
        .find(|info| info.key == key || info.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| AlgoError::UnknownAlgorithm(key.to_string()))
}
