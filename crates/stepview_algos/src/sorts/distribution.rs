//! Non-comparison sorts. They read the whole input up front and narrate only
//! the writes, so their traces are `set`/`key` pairs with no comparisons.

use crate::recorder::Recorder;

/// Value span above which counting sort falls back to writing the sorted
/// output directly, as a multiple of `n`.
const COUNTING_SPAN_FACTOR: u128 = 10;

/// Write `value` to `index` and highlight it.
fn place(rec: &mut Recorder, index: usize, value: i64) {
    rec.set(index, value);
    rec.key(index);
}

/// Smallest and largest value. `None` for an empty input.
fn bounds(values: &[i64]) -> Option<(i64, i64)> {
    let min = values.iter().copied().min()?;
    let max = values.iter().copied().max()?;
    Some((min, max))
}

/// Distance of `value` above `min`. Never overflows for any pair of `i64`s.
fn offset(value: i64, min: i64) -> u64 {
    (i128::from(value) - i128::from(min)) as u64
}

/// Stable counting sort over prefix sums.
///
/// Wide value ranges skip the counts table and write the sorted values in
/// order instead.
pub fn counting(rec: &mut Recorder) {
    let original = rec.values().to_vec();
    let n = original.len();
    let Some((min, max)) = bounds(&original).filter(|_| n > 1) else {
        rec.confirm_all();
        return;
    };

    let span = u128::from(offset(max, min)) + 1;
    if span > COUNTING_SPAN_FACTOR * n as u128 {
        let mut sorted = original;
        sorted.sort();
        for (index, value) in sorted.into_iter().enumerate() {
            place(rec, index, value);
        }
        rec.clear_key();
        rec.confirm_all();
        return;
    }

    // Exclusive end of each value's output slot.
    let mut ends = vec![0usize; span as usize];
    for &value in &original {
        ends[offset(value, min) as usize] += 1;
    }
    for slot in 1..ends.len() {
        ends[slot] += ends[slot - 1];
    }

    // Back to front keeps equal values in input order.
    for &value in original.iter().rev() {
        let slot = offset(value, min) as usize;
        ends[slot] -= 1;
        place(rec, ends[slot], value);
    }
    rec.clear_key();
    rec.confirm_all();
}

/// Least-significant-digit radix sort in base 10. Negative inputs are
/// shifted by the minimum before the digit passes.
pub fn radix_lsd(rec: &mut Recorder) {
    let n = rec.len();
    let Some((min, max)) = bounds(rec.values()).filter(|_| n > 1) else {
        rec.confirm_all();
        return;
    };

    let base = min.min(0);
    let mut keys: Vec<u64> = rec.values().iter().map(|&v| offset(v, base)).collect();
    let largest = offset(max, base);

    let mut exp: u64 = 1;
    while largest / exp > 0 {
        let digit = |key: u64| ((key / exp) % 10) as usize;
        let mut counts = [0usize; 10];
        for &key in &keys {
            counts[digit(key)] += 1;
        }
        for d in 1..10 {
            counts[d] += counts[d - 1];
        }

        let mut output = vec![0u64; n];
        for &key in keys.iter().rev() {
            let d = digit(key);
            counts[d] -= 1;
            output[counts[d]] = key;
        }

        for (index, &key) in output.iter().enumerate() {
            let value = (i128::from(base) + i128::from(key)) as i64;
            place(rec, index, value);
        }
        keys = output;

        match exp.checked_mul(10) {
            Some(next) => exp = next,
            None => break,
        }
    }
    rec.clear_key();
    rec.confirm_all();
}

/// Scatters values into up to `n` evenly spaced buckets by their position in
/// the value range, sorts each bucket, and writes them back in order.
pub fn bucket(rec: &mut Recorder) {
    let original = rec.values().to_vec();
    let n = original.len();
    let Some((min, max)) = bounds(&original).filter(|_| n > 1) else {
        rec.confirm_all();
        return;
    };
    if min == max {
        rec.confirm_all();
        return;
    }

    let range = u128::from(offset(max, min));
    let count = (n as u128).min(range + 1) as usize;
    let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); count];
    for &value in &original {
        let index = u128::from(offset(value, min)) * (count as u128 - 1) / range;
        buckets[index as usize].push(value);
    }

    let mut index = 0;
    for mut bucket in buckets {
        bucket.sort();
        for value in bucket {
            place(rec, index, value);
            index += 1;
        }
    }
    rec.clear_key();
    rec.confirm_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stepview_core::{OpKind, Trace};

    fn run(sort: fn(&mut Recorder), data: &[i64]) -> Vec<stepview_core::Operation> {
        let mut rec = Recorder::new(data);
        sort(&mut rec);
        rec.into_parts().1
    }

    #[test]
    fn test_distribution_sorts_make_no_comparisons() {
        let data = [7, -3, 12, 0, 7, 5, -3, 1];
        for sort in [counting, radix_lsd, bucket] {
            let ops = run(sort, &data);
            assert!(ops
                .iter()
                .all(|op| !matches!(op.kind(), OpKind::Compare | OpKind::Swap)));

            let replayed = Trace::new(data.to_vec(), ops).replay().unwrap();
            assert_eq!(replayed.metrics.comparisons, 0);
            assert_eq!(replayed.metrics.swaps, 0);
            assert_eq!(replayed.metrics.confirms, data.len() as u64);
            assert_eq!(replayed.state.values(), &[-3, -3, 0, 1, 5, 7, 7, 12]);
        }
    }

    #[test]
    fn test_counting_writes_each_position_once() {
        let ops = run(counting, &[3, 1, 2, 1]);
        let mut written: Vec<usize> = ops
            .iter()
            .filter(|op| op.kind() == OpKind::Set)
            .map(|op| op.positions()[0])
            .collect();
        written.sort_unstable();
        assert_eq!(written, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_counting_wide_range_falls_back() {
        let data = [1_000_000, -5, 42];
        let ops = run(counting, &data);
        let sets: Vec<usize> = ops
            .iter()
            .filter(|op| op.kind() == OpKind::Set)
            .map(|op| op.positions()[0])
            .collect();
        assert_eq!(sets, vec![0, 1, 2]);
    }

    #[test]
    fn test_radix_pass_count_follows_digit_count() {
        // Largest key 345 has three digits, so three passes of four writes.
        let ops = run(radix_lsd, &[345, 12, 7, 200]);
        let sets = ops.iter().filter(|op| op.kind() == OpKind::Set).count();
        assert_eq!(sets, 12);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let data = [i64::MAX, i64::MIN, 0, -1];
        for sort in [counting, radix_lsd, bucket] {
            let replayed = Trace::new(data.to_vec(), run(sort, &data)).replay().unwrap();
            assert_eq!(replayed.state.values(), &[i64::MIN, -1, 0, i64::MAX]);
        }
    }

    #[test]
    fn test_bucket_all_equal_only_confirms() {
        let ops = run(bucket, &[4, 4, 4]);
        assert!(ops.iter().all(|op| op.kind() == OpKind::Confirm));
        assert_eq!(ops.len(), 3);
    }
}
