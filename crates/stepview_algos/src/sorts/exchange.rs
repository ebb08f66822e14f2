use crate::recorder::Recorder;

/// Adjacent exchanges with an early exit once a pass makes no swap.
pub fn bubble(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    for pass in 0..n {
        let mut swapped = false;
        for j in 0..n - pass - 1 {
            if rec.compare(j, j + 1).is_gt() {
                rec.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    rec.confirm_all();
}

/// Bidirectional bubble sort. Each pass confirms the boundary it settles.
pub fn cocktail(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let mut start = 0;
    let mut end = n - 1;
    while start < end {
        let mut swapped = false;
        for i in start..end {
            if rec.compare(i, i + 1).is_gt() {
                rec.swap(i, i + 1);
                swapped = true;
            }
        }
        rec.confirm(end);
        end -= 1;
        if !swapped {
            break;
        }

        swapped = false;
        for i in (start + 1..=end).rev() {
            if rec.compare(i - 1, i).is_gt() {
                rec.swap(i - 1, i);
                swapped = true;
            }
        }
        rec.confirm(start);
        start += 1;
        if !swapped {
            break;
        }
    }
    rec.confirm_all();
}

/// Bubble passes over a gap that shrinks by a factor of 1.3 until it reaches 1
/// and a pass makes no swap.
pub fn comb(rec: &mut Recorder) {
    let n = rec.len();
    if n <= 1 {
        rec.confirm_all();
        return;
    }

    let mut gap = n;
    let mut swapped = true;
    while gap > 1 || swapped {
        gap = (gap * 10 / 13).max(1);
        swapped = false;
        for i in 0..n - gap {
            if rec.compare(i, i + gap).is_gt() {
                rec.swap(i, i + gap);
                swapped = true;
            }
        }
    }
    rec.confirm_all();
}
