use crate::bulk;
use crate::error::{Result, SeqtError};
use crate::store::{SequenceStore, GROUND};
use std::hash::Hash;
use tracing::{info, trace};

/// Outcome of one eviction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EvictionReport {
    /// Rows before the pass, including row 0
    pub before: usize,
    /// Rows after the pass, including row 0
    pub after: usize,
    /// Rows flagged by rank or floor before the dependency closure
    pub targeted: usize,
}

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Shrinks the table to roughly `keep_budget` rows.
    ///
    /// The least significant rows are flagged first, then every row built on
    /// a flagged row is flagged too, so the result may be smaller than the
    /// budget but never references a dropped row. With `min_sigma` set, every
    /// composite below it is flagged as well. Row 0 always survives.
    pub(crate) fn evict(&mut self, keep_budget: usize, min_sigma: Option<f64>) -> Result<EvictionReport> {
        self.recompute_significance();

        let total = self.total();
        let keep_budget = keep_budget.max(1);
        let to_remove = total.saturating_sub(keep_budget);

        let mut flagged = vec![false; total];
        let ranked = self.rank();
        bulk::scatter_value(&ranked[..to_remove.min(ranked.len())], true, &mut flagged);

        if let Some(floor) = min_sigma {
            let below = bulk::pack(&self.significance, |&s| s < floor);
            let below: Vec<u32> = below
                .into_iter()
                .filter(|&id| id != GROUND && !self.is_atom(id))
                .collect();
            bulk::scatter_value(&below, true, &mut flagged);
        }

        let targeted = flagged.iter().filter(|&&f| f).count();
        let flagged = close_over_dependents(&self.seqs, flagged, targeted)?;

        let keep = bulk::pack(&flagged, |&f| !f);
        debug_assert_eq!(keep.first(), Some(&GROUND));
        self.compact(&keep)?;

        let report = EvictionReport {
            before: total,
            after: self.total(),
            targeted,
        };
        info!(
            before = report.before,
            after = report.after,
            targeted = report.targeted,
            closure = (report.before - report.after) - report.targeted,
            "evicted least significant sequences"
        );
        Ok(report)
    }
}

/// Grows `flagged` until no unflagged row references a flagged one.
///
/// The flagged set only ever grows; dropping below `target` means the closure
/// step is broken.
fn close_over_dependents(seqs: &[(u32, u32)], mut flagged: Vec<bool>, target: usize) -> Result<Vec<bool>> {
    if flagged[GROUND as usize] {
        return Err(SeqtError::EvictionShrank {
            flagged: 0,
            target,
        });
    }

    let mut previous = target;
    loop {
        flagged = bulk::depends_on_flagged(seqs, &flagged);
        let count = flagged.iter().filter(|&&f| f).count();
        trace!(previous, count, "eviction closure step");

        if count < previous {
            return Err(SeqtError::EvictionShrank {
                flagged: count,
                target,
            });
        }
        if count == previous {
            return Ok(flagged);
        }
        previous = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LEAF;

    #[test]
    fn test_closure_reaches_fixed_point() {
        // 1 a, 2 b, 3 = (1,2), 4 = (3,2), 5 = (2,2)
        let seqs = vec![LEAF, LEAF, LEAF, (1, 2), (3, 2), (2, 2)];
        let flagged = vec![false, true, false, false, false, false];

        let closed = close_over_dependents(&seqs, flagged, 1).unwrap();
        assert_eq!(closed, vec![false, true, false, true, true, false]);
    }

    #[test]
    fn test_closure_rejects_ground() {
        let seqs = vec![LEAF, LEAF];
        let err = close_over_dependents(&seqs, vec![true, false], 1).unwrap_err();
        assert!(matches!(err, SeqtError::EvictionShrank { .. }));
    }

    #[test]
    fn test_closure_detects_shrinking() {
        // a target larger than what is actually flagged can only shrink
        let seqs = vec![LEAF, LEAF, LEAF];
        let err = close_over_dependents(&seqs, vec![false, true, false], 2).unwrap_err();
        assert_eq!(
            err,
            SeqtError::EvictionShrank {
                flagged: 1,
                target: 2
            }
        );
    }

    #[test]
    fn test_evict_hits_budget_and_stays_consistent() {
        let mut store = SequenceStore::new();
        for c in "abcdef".chars() {
            store.advance_recency();
            store.intern_token_atom(c);
        }
        assert_eq!(store.total(), 7);

        let report = store.evict(3, None).unwrap();
        assert_eq!(report.before, 7);
        assert_eq!(report.after, 3);
        assert_eq!(report.targeted, 4);

        // the two most recent atoms survive
        assert_eq!(store.alphabet.id(&'e'), Some(1));
        assert_eq!(store.alphabet.id(&'f'), Some(2));
        assert_eq!(store.alphabet.id(&'a'), None);
    }

    #[test]
    fn test_evict_drops_dependents_of_evicted_children() {
        let mut store = SequenceStore::new();
        let a = store.intern_token_atom('a');
        let b = store.intern_token_atom('b');
        let c = store.intern_token_atom('c');
        store.counts[a as usize] = 10;
        store.counts[b as usize] = 10;
        let ab = store.append(&[(a, b)], 0).unwrap()[0];
        let abc = store.append(&[(ab, c)], 0).unwrap()[0];

        // ab falls below expectation while abc stays strong
        store.counts[a as usize] = 20;
        store.counts[b as usize] = 20;
        store.counts[ab as usize] = 3;
        store.counts[c as usize] = 3;
        store.counts[abc as usize] = 3;

        let report = store.evict(100, Some(0.5)).unwrap();
        assert_eq!(report.targeted, 1);
        assert_eq!(report.after, 4);
        assert_eq!(store.seqs, vec![LEAF; 4]);
        assert!(store.seq_index.is_empty());
    }

    #[test]
    fn test_evict_prefers_longer_rows_on_ties() {
        let mut store = SequenceStore::new();
        let a = store.intern_token_atom('a');
        let b = store.intern_token_atom('b');
        let ab = store.append(&[(a, b)], 0).unwrap()[0];
        store.append(&[(ab, b)], 0).unwrap();

        // everything scores neutral, so the longest rows go first
        let report = store.evict(3, None).unwrap();
        assert_eq!(report.targeted, 2);
        assert_eq!(report.after, 3);
        assert_eq!(store.alphabet.id(&'a'), Some(1));
        assert_eq!(store.alphabet.id(&'b'), Some(2));
    }

    #[test]
    fn test_min_sigma_floor_flags_weak_composites() {
        let mut store = SequenceStore::new();
        let a = store.intern_token_atom('a');
        let b = store.intern_token_atom('b');
        store.counts[a as usize] = 10;
        store.counts[b as usize] = 10;
        store.append(&[(a, b)], 0).unwrap();

        // the pair never occurred after admission, so it scores neutral
        let report = store.evict(100, Some(0.5)).unwrap();
        assert_eq!(report.targeted, 1);
        assert_eq!(store.total(), 3);
        assert!(store.seq_index.is_empty());
    }
}
