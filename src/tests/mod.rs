
use crate::store::{SequenceStore, GROUND, LEAF};
use std::hash::Hash;

/// Ids of every composite row whose children are `(left, right)`.
pub(crate) fn rows_with_composition<T>(store: &SequenceStore<T>, pair: (u32, u32)) -> Vec<u32> {
    store
        .seqs
        .iter()
        .enumerate()
        .filter(|&(id, &seq)| id != GROUND as usize && seq == pair)
        .map(|(id, _)| id as u32)
        .collect()
}

/// Panics with a description of the first broken structural invariant.
pub(crate) fn assert_consistent<T: Hash + Eq + Clone>(store: &SequenceStore<T>) {
    let total = store.total();
    assert_eq!(store.seqs[GROUND as usize], LEAF);
    assert_eq!(store.recency[GROUND as usize], -1);

    for column_len in [
        store.seqs.len(),
        store.counts.len(),
        store.initial_counts.len(),
        store.initial_characters_read.len(),
        store.recency.len(),
        store.expected.len(),
        store.stddev.len(),
        store.significance.len(),
    ] {
        assert_eq!(column_len, total, "column length out of sync");
    }

    let mut composites = 0;
    for id in 1..total {
        let (left, right) = store.seqs[id];
        if (left, right) == LEAF {
            assert_eq!(store.lengths[id], 1, "atom {} has length {}", id, store.lengths[id]);
            assert!(store.alphabet.token(id as u32).is_some(), "atom {} has no token", id);
            continue;
        }
        composites += 1;

        assert!(left != GROUND && right != GROUND, "row {} references row 0", id);
        assert!(
            (left as usize) < id && (right as usize) < id,
            "row {} references a later or missing row ({}, {})",
            id,
            left,
            right
        );
        assert_eq!(
            store.lengths[id],
            store.lengths[left as usize] + store.lengths[right as usize],
            "length of row {} is not additive",
            id
        );
        assert_eq!(store.seq_index.get(&(left, right)), Some(&(id as u32)));
    }

    assert_eq!(store.seq_index.len(), composites, "duplicate or stale compositions");
    assert_eq!(store.alphabet.len() + composites + 1, total);
}

/// Returns true if `needle` occurs contiguously in `haystack`.
pub(crate) fn contains_run<T: PartialEq>(haystack: &[T], needle: &[T]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
