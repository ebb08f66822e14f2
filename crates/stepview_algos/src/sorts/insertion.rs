use crate::recorder::Recorder;

/// Shifts larger elements right and drops the key into the gap.
pub fn insertion(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    insert_run(rec, 0, n);
    rec.confirm_all();
}

/// Insertion sort over `[start, end)`, clearing the key highlight when done.
pub(super) fn insert_run(rec: &mut Recorder, start: usize, end: usize) {
    for i in start + 1..end {
        let key = rec.value(i);
        rec.key(i);

        // Position `i` may already hold a shifted value; the key lives in `key`.
        let mut dest = i;
        while dest > start {
            rec.note_compare(dest - 1, i);
            let left = rec.value(dest - 1);
            if left <= key {
                break;
            }
            rec.shift(dest, left);
            dest -= 1;
        }

        if dest != i {
            rec.set(dest, key);
        }
        rec.key(dest);
    }
    rec.clear_key();
}

/// Gapped insertion sort with the gap halving from `n / 2` down to 1.
pub fn shell(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let mut gap = n / 2;
    while gap > 0 {
        for i in gap..n {
            let key = rec.value(i);
            rec.key(i);

            let mut j = i;
            while j >= gap {
                rec.note_compare(j - gap, j);
                let left = rec.value(j - gap);
                if left <= key {
                    break;
                }
                rec.shift(j, left);
                j -= gap;
            }

            if j != i {
                rec.set(j, key);
            }
            rec.key(j);
        }
        gap /= 2;
    }
    rec.clear_key();
    rec.confirm_all();
}
