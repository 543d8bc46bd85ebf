//! Co-occurrence statistics against an independence null model.
//!
//! For two children seen `a` and `b` times, with `n = a + b`, `p_a = a / n`
//! and `p_b = b / n`, the expected joint count is `n * p_a * p_b` with
//! variance `expected * (1 - p_a * p_b)`. A row's significance is the z-score
//! of its observed joint count.

use crate::bulk;
use crate::config::SeqtConfig;
use crate::store::{SequenceStore, GROUND, LEAF};
use std::hash::Hash;

/// Variance floor; keeps the z-score finite when the expectation collapses.
pub(crate) const VARIANCE_EPSILON: f64 = 1e-6;

/// Expected joint count, its standard deviation and the resulting z-score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PairStats {
    pub expected: f64,
    pub stddev: f64,
    pub z_score: f64,
}

impl PairStats {
    pub(crate) const NEUTRAL: PairStats = PairStats {
        expected: 0.0,
        stddev: 0.0,
        z_score: 0.0,
    };
}

/// Scores an observed joint count `ab` for children counts `a` and `b`.
///
/// Returns [`PairStats::NEUTRAL`] when there is nothing to compare against or
/// the joint count exceeds either child.
pub(crate) fn z_score(a: u64, b: u64, ab: u64) -> PairStats {
    if a + b == 0 || ab > a || ab > b {
        return PairStats::NEUTRAL;
    }

    let total = (a + b) as f64;
    let p_a = a as f64 / total;
    let p_b = b as f64 / total;

    let expected = total * p_a * p_b;
    let variance = (expected * (1.0 - p_a * p_b)).max(VARIANCE_EPSILON);
    let stddev = variance.sqrt();
    let z = (ab as f64 - expected) / stddev;

    if !z.is_finite() {
        return PairStats::NEUTRAL;
    }

    PairStats {
        expected,
        stddev,
        z_score: z,
    }
}

impl<T: Hash + Eq + Clone> SequenceStore<T> {
    /// Refreshes expected count, stddev and significance for every row.
    ///
    /// Composites are scored on what happened since they were created: child
    /// counts are taken relative to the baseline captured at admission, and
    /// the joint count is the row's own count. The left child's occurrence
    /// that led to admission was counted before the baseline was taken, so it
    /// is added back. Atoms and row 0 are neutral.
    pub(crate) fn recompute_significance(&mut self) {
        let seqs = &self.seqs;
        let counts = &self.counts;
        let initial_counts = &self.initial_counts;

        let stats = bulk::map_indexed(self.total(), |i| {
            let (left, right) = seqs[i];
            if (left, right) == LEAF {
                return PairStats::NEUTRAL;
            }
            let (base_left, base_right) = initial_counts[i];
            let a = counts[left as usize].saturating_sub(base_left) + 1;
            let b = counts[right as usize].saturating_sub(base_right);
            z_score(a, b, counts[i])
        });

        self.expected = stats.iter().map(|s| s.expected).collect();
        self.stddev = stats.iter().map(|s| s.stddev).collect();
        self.significance = stats.iter().map(|s| s.z_score).collect();
    }

    /// Scores a pair that is not tracked yet.
    ///
    /// The second row's occurrence is completing right now, so its count is
    /// taken one ahead. The pair has never been tracked, so its joint count
    /// is unknown; the smaller child count is used in its place. That is an
    /// upper bound, not an observed co-occurrence count, so admission mostly
    /// rewards pairs whose children occur about equally often.
    pub(crate) fn candidate_stats(&self, (first, second): (u32, u32)) -> (PairStats, u64) {
        let a = self.counts[first as usize];
        let b = self.counts[second as usize] + 1;
        let joint = a.min(b);
        (z_score(a, b, joint), joint)
    }

    /// Whether a candidate pair clears both admission thresholds.
    pub(crate) fn admit(&self, config: &SeqtConfig, pair: (u32, u32)) -> bool {
        let (stats, joint) = self.candidate_stats(pair);
        stats.z_score >= config.sigma && joint >= config.min_occurrences
    }

    /// Each row's significance raised to the highest significance of anything
    /// built on top of it.
    ///
    /// Children always have lower ids than their parents, so one descending
    /// pass sees every parent before its children.
    pub(crate) fn effective_significance(&self) -> Vec<f64> {
        let mut effective = self.significance.clone();
        for id in (1..self.total()).rev() {
            let (left, right) = self.seqs[id];
            if (left, right) == LEAF {
                continue;
            }
            let value = effective[id];
            for child in [left, right] {
                let slot = &mut effective[child as usize];
                if value > *slot {
                    *slot = value;
                }
            }
        }
        effective
    }

    /// Row ids except row 0, least significant first.
    ///
    /// Rows are ordered by effective significance, so a row never ranks
    /// below something that depends on it. Ties go to the longer row first,
    /// then to the row whose last occurrence is oldest, then to the newer row.
    pub(crate) fn rank(&self) -> Vec<u32> {
        let effective = self.effective_significance();
        let mut ids: Vec<u32> = (1..self.total() as u32).collect();
        ids.sort_by(|&x, &y| {
            let (x, y) = (x as usize, y as usize);
            effective[x]
                .total_cmp(&effective[y])
                .then(self.lengths[y].cmp(&self.lengths[x]))
                .then(self.recency[x].cmp(&self.recency[y]))
                .then(y.cmp(&x))
        });
        debug_assert!(!ids.contains(&GROUND));
        ids
    }
}
