use crate::bulk;
use crate::store::{SequenceStore, GROUND};
use std::hash::Hash;

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Enumerates every `(A, B)` where `B` is active and an occurrence of `A`
    /// ended exactly where that occurrence of `B` began.
    ///
    /// `A` qualifies when its recency is `-length(B)`. Only the latest ending
    /// per row is known, so earlier endings of the same row are not found.
    /// The result is sorted and free of duplicates.
    pub(crate) fn find_candidates(&self, active: &[u32]) -> Vec<(u32, u32)> {
        // active rows, ascending by length
        let mut current: Vec<u32> = active.iter().copied().filter(|&id| id != GROUND).collect();
        let mut current_lengths = bulk::gather(&current, &self.lengths);
        bulk::sort_by_key(&mut current_lengths, &mut current);

        // rows that ended before the cursor, ascending by distance
        let mut ended = bulk::pack(&self.recency, |&r| r < 0);
        ended.retain(|&id| id != GROUND);
        let mut distances: Vec<u64> = bulk::gather(&ended, &self.recency)
            .into_iter()
            .map(|r| r.unsigned_abs())
            .collect();
        bulk::sort_by_key(&mut distances, &mut ended);

        // ended[begin[i]..end[i]] are the predecessors of current[i]
        let (begins, sizes): (Vec<usize>, Vec<usize>) = current_lengths
            .iter()
            .map(|&length| {
                let begin = distances.partition_point(|&d| d < length);
                let end = distances.partition_point(|&d| d <= length);
                (begin, end - begin)
            })
            .unzip();

        let offsets = bulk::inclusive_scan(&sizes);
        let found_count = offsets.last().copied().unwrap_or(0);
        if found_count == 0 {
            return Vec::new();
        }

        let mut found = vec![(GROUND, GROUND); found_count];
        for (i, &second) in current.iter().enumerate() {
            let start = offsets[i] - sizes[i];
            for k in 0..sizes[i] {
                found[start + k] = (ended[begins[i] + k], second);
            }
        }

        found.sort_unstable();
        found.dedup();
        found
    }
}
