use crate::bulk;
use crate::store::{SequenceStore, GROUND};
use std::hash::Hash;

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Moves every row one token further into the past.
    ///
    /// Row 0 stays pinned at -1 so it can never extend anything.
    pub(crate) fn advance_recency(&mut self) {
        bulk::decrement_all(&mut self.recency);
        self.recency[GROUND as usize] = -1;
    }

    /// Rows whose occurrence ends at the cursor, plus the just-read atom.
    ///
    /// The atom is included even when its own recency still points at an
    /// earlier occurrence. Returned ids are ascending.
    pub(crate) fn currently_eligible(&self, index: u32) -> Vec<u32> {
        let mut eligible = bulk::pack(&self.recency, |&r| r == 0);
        if let Err(pos) = eligible.binary_search(&index) {
            eligible.insert(pos, index);
        }
        eligible.retain(|&id| id != GROUND);
        eligible
    }

    /// Records a completed occurrence for every id.
    pub(crate) fn confirm_occurrences(&mut self, ids: &[u32]) {
        for &id in ids {
            self.counts[id as usize] += 1;
        }
        bulk::scatter_value(ids, 0, &mut self.recency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_keeps_ground_pinned() {
        let mut store = SequenceStore::new();
        store.intern_token_atom('a');
        store.advance_recency();
        store.advance_recency();
        assert_eq!(store.recency, vec![-1, -2]);
    }

    #[test]
    fn test_eligible_forces_current_atom() {
        let mut store = SequenceStore::new();
        let a = store.intern_token_atom('a');
        let b = store.intern_token_atom('b');
        store.advance_recency();

        // nothing ends at the cursor, but the atom just read is eligible
        assert_eq!(store.currently_eligible(a), vec![a]);

        store.recency[b as usize] = 0;
        assert_eq!(store.currently_eligible(a), vec![a, b]);
    }

    #[test]
    fn test_confirm_occurrences() {
        let mut store = SequenceStore::new();
        let a = store.intern_token_atom('a');
        let b = store.intern_token_atom('b');
        store.advance_recency();
        store.advance_recency();

        store.confirm_occurrences(&[b]);
        assert_eq!(store.counts[a as usize], 0);
        assert_eq!(store.counts[b as usize], 1);
        assert_eq!(store.recency[a as usize], -2);
        assert_eq!(store.recency[b as usize], 0);
    }
}
