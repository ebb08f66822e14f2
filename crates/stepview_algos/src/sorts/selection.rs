use crate::recorder::Recorder;

/// Selects the minimum of the unsorted suffix and swaps it into place.
pub fn selection(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    for i in 0..n - 1 {
        let mut min = i;
        rec.key(i);
        for j in i + 1..n {
            if rec.compare(min, j).is_gt() {
                min = j;
                rec.key(min);
            }
        }
        if min != i {
            rec.swap(i, min);
            rec.key(i);
        }
    }
    rec.clear_key();
    rec.confirm_all();
}

/// Max-heap sort. Confirms each slot as it is extracted.
pub fn heap(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    for start in (0..n / 2).rev() {
        sift_down(rec, start, n - 1);
    }
    for end in (1..n).rev() {
        rec.swap(0, end);
        rec.confirm(end);
        sift_down(rec, 0, end - 1);
    }
    rec.confirm(0);
}

/// Restore the heap property below `start`, considering slots up to `end`.
fn sift_down(rec: &mut Recorder, start: usize, end: usize) {
    let mut root = start;
    loop {
        let child = 2 * root + 1;
        if child > end {
            return;
        }

        let mut candidate = root;
        if rec.compare(candidate, child).is_lt() {
            candidate = child;
        }
        let right = child + 1;
        if right <= end && rec.compare(candidate, right).is_lt() {
            candidate = right;
        }
        if candidate == root {
            return;
        }

        rec.swap(root, candidate);
        root = candidate;
    }
}
