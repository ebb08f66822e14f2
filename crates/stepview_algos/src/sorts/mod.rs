//! Sorting algorithms that narrate themselves into a
//! [`Recorder`](crate::Recorder).
//!
//! Every sort ends with the array in ascending order and every position
//! confirmed, so all traces finish with the same terminal sweep.

mod distribution;
mod exchange;
mod insertion;
mod merge;
mod quick;
mod selection;

pub use distribution::{bucket, counting, radix_lsd};
pub use exchange::{bubble, cocktail, comb};
pub use insertion::{insertion, shell};
pub use merge::{merge, timsort};
pub use quick::quick;
pub use selection::{heap, selection};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::Recorder;
    use stepview_core::{OpKind, Trace};

    type Sort = fn(&mut Recorder);

    const SORTS: [(&str, Sort); 13] = [
        ("bubble", bubble),
        ("cocktail", cocktail),
        ("comb", comb),
        ("insertion", insertion),
        ("shell", shell),
        ("selection", selection),
        ("heap", heap),
        ("merge", merge),
        ("timsort", timsort),
        ("quick", quick),
        ("counting", counting),
        ("radix_lsd", radix_lsd),
        ("bucket", bucket),
    ];

    fn datasets() -> Vec<Vec<i64>> {
        vec![
            vec![],
            vec![7],
            vec![2, 1],
            vec![5, 2, 8, 1, 9],
            vec![3, 3, 3, 3],
            vec![1, 2, 3, 4, 5, 6],
            vec![9, 8, 7, 6, 5, 4, 3, 2, 1],
            vec![4, -2, 7, 4, 0, -2, 11, 3, 3, 8, 1],
            (0..70).map(|i| (i * 37) % 23 - 11).collect(),
        ]
    }

    #[test]
    fn test_every_sort_sorts_and_replays() {
        for (name, sort) in SORTS {
            for data in datasets() {
                let mut rec = Recorder::new(&data);
                sort(&mut rec);
                let (values, ops) = rec.into_parts();

                let mut expected = data.clone();
                expected.sort();
                assert_eq!(values, expected, "{name} on {data:?}");

                let replayed = Trace::new(data.clone(), ops).replay().unwrap();
                assert_eq!(replayed.state.values(), expected.as_slice(), "{name} replay");
            }
        }
    }

    #[test]
    fn test_every_position_is_confirmed() {
        for (name, sort) in SORTS {
            let data = vec![6, 1, 5, 2, 4, 3];
            let mut rec = Recorder::new(&data);
            sort(&mut rec);
            let (_, ops) = rec.into_parts();

            let mut confirmed: Vec<usize> = ops
                .iter()
                .filter(|op| op.kind() == OpKind::Confirm)
                .map(|op| op.positions()[0])
                .collect();
            confirmed.sort_unstable();
            assert_eq!(confirmed, (0..data.len()).collect::<Vec<_>>(), "{name}");

            let replayed = Trace::new(data.clone(), ops).replay().unwrap();
            assert_eq!(replayed.metrics.confirms, data.len() as u64, "{name}");
            assert_eq!(replayed.state.highlights().confirmed.len(), data.len(), "{name}");
        }
    }

    #[test]
    fn test_timsort_merges_past_one_run() {
        let data: Vec<i64> = (0..80).rev().collect();
        let mut rec = Recorder::new(&data);
        timsort(&mut rec);
        let (values, ops) = rec.into_parts();

        let marks: Vec<&[usize]> = ops
            .iter()
            .filter(|op| op.kind() == OpKind::MergeMark)
            .map(|op| op.positions())
            .collect();
        assert_eq!(marks, vec![&[0, 63][..], &[0, 79][..]]);
        assert_eq!(values, (0..80).collect::<Vec<_>>());
    }

    #[test]
    fn test_bubble_trace_on_small_input() {
        let mut rec = Recorder::new(&[5, 2, 8, 1, 9]);
        bubble(&mut rec);
        let (_, ops) = rec.into_parts();

        let count = |kind| ops.iter().filter(|op| op.kind() == kind).count();
        assert_eq!(count(OpKind::Compare), 10);
        assert_eq!(count(OpKind::Swap), 4);
        assert_eq!(count(OpKind::Confirm), 5);
        assert_eq!(ops.len(), 19);
    }
}
