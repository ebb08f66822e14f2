use super::insertion::insert_run;
use crate::recorder::Recorder;

/// Run length sorted by insertion before timsort starts merging.
const MIN_RUN: usize = 32;

/// Bottom-up merge sort writing merged runs back through `set`.
pub fn merge(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let mut width = 1;
    while width < n {
        let stride = 2 * width;
        for lo in (0..n).step_by(stride) {
            let mid = (lo + width - 1).min(n - 1);
            let hi = (lo + stride - 1).min(n - 1);
            if mid >= hi {
                continue;
            }
            merge_runs(rec, lo, mid, hi);
        }
        width *= 2;
    }
    rec.confirm_all();
}

/// Simplified timsort: insertion-sorts fixed runs of [`MIN_RUN`], then
/// merges neighbouring runs of doubling width.
pub fn timsort(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let run = MIN_RUN.min(n);
    for start in (0..n).step_by(run) {
        insert_run(rec, start, (start + run).min(n));
    }

    let mut width = run;
    while width < n {
        for lo in (0..n).step_by(2 * width) {
            let mid = lo + width;
            let end = (lo + 2 * width).min(n);
            if mid < end {
                merge_runs(rec, lo, mid - 1, end - 1);
            }
        }
        width *= 2;
    }
    rec.confirm_all();
}

/// Merge the sorted runs `[lo, mid]` and `[mid + 1, hi]`.
fn merge_runs(rec: &mut Recorder, lo: usize, mid: usize, hi: usize) {
    let aux = rec.values()[lo..=hi].to_vec();
    let left_len = mid - lo + 1;
    rec.merge_mark(lo, hi);

    let (mut i, mut j) = (0, left_len);
    for k in lo..=hi {
        let take_left = if i >= left_len {
            false
        } else if j >= aux.len() {
            true
        } else {
            rec.merge_compare(lo + i, lo + j, k);
            aux[i] <= aux[j]
        };

        if take_left {
            rec.set(k, aux[i]);
            i += 1;
        } else {
            rec.set(k, aux[j]);
            j += 1;
        }
    }
}
