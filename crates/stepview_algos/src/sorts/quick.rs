use crate::recorder::Recorder;

/// Lomuto quicksort with a median-of-three pivot and an explicit stack.
pub fn quick(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let mut stack = vec![(0, n - 1)];
    while let Some((low, high)) = stack.pop() {
        if low >= high {
            continue;
        }

        let pivot = partition(rec, low, high);
        let Some(p) = pivot else {
            continue;
        };
        if p + 1 < high {
            stack.push((p + 1, high));
        }
        if p > low + 1 {
            stack.push((low, p - 1));
        }
    }
    rec.confirm_all();
}

/// Partition `[low, high]` around its median of three. Returns the pivot's
/// final slot, or `None` if the range was all equal and is already final.
fn partition(rec: &mut Recorder, low: usize, high: usize) -> Option<usize> {
    let mid = low + (high - low) / 2;
    rec.note_compare(low, mid);
    rec.note_compare(mid, high);
    rec.note_compare(low, high);

    let mut trio = [
        (rec.value(low), low),
        (rec.value(mid), mid),
        (rec.value(high), high),
    ];
    trio.sort_unstable();
    let median = trio[1].1;
    if median != high {
        rec.swap(median, high);
    }

    let pivot = rec.value(high);
    rec.pivot(high);
    if (low..=high).all(|k| rec.value(k) == pivot) {
        for k in low..=high {
            rec.confirm(k);
        }
        return None;
    }

    let mut store = low;
    for j in low..high {
        if rec.compare(j, high).is_le() {
            if store != j {
                rec.swap(store, j);
            }
            store += 1;
        }
    }
    if store != high {
        rec.swap(store, high);
    }
    Some(store)
}
