use crate::error::Result;
use crate::seqt::Seqt;
use std::fmt;
use std::hash::Hash;

/// One tracked sequence, fully rendered.
///
/// Carries no row id: ids are renumbered by every eviction, so a snapshot is
/// only meaningful through its values.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry<T> {
    /// The tokens the sequence spans, in stream order
    pub tokens: Vec<T>,
    /// Completed occurrences
    pub count: u64,
    /// Z-score against independence of the two halves; 0 for atoms
    pub significance: f64,
    /// Joint count expected under independence
    pub expected: f64,
    /// Standard deviation of the expected count
    pub stddev: f64,
    /// Stream position when the sequence started being tracked
    pub first_seen: u64,
}

impl<T> SnapshotEntry<T> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl SnapshotEntry<char> {
    pub fn text(&self) -> String {
        self.tokens.iter().collect()
    }
}

impl<T: Hash + Eq + Clone> Seqt<T> {
    /// Materializes every tracked sequence in table order.
    pub fn snapshot(&self) -> Result<Vec<SnapshotEntry<T>>> {
        let store = &self.store;
        (1..store.total())
            .map(|i| {
                Ok(SnapshotEntry {
                    tokens: store.render(i as u32)?,
                    count: store.counts[i],
                    significance: store.significance[i],
                    expected: store.expected[i],
                    stddev: store.stddev[i],
                    first_seen: store.initial_characters_read[i],
                })
            })
            .collect()
    }
}

impl fmt::Display for Seqt<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.snapshot().map_err(|_| fmt::Error)?;
        for entry in entries {
            writeln!(
                f,
                "{:?} {} {:.3}",
                entry.text(),
                entry.count,
                entry.significance
            )?;
        }
        Ok(())
    }
}
