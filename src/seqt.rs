use crate::bulk;
use crate::config::SeqtConfig;
use crate::error::{Result, SeqtError};
use crate::store::SequenceStore;
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Online discovery of statistically significant repeating subsequences.
///
/// Tokens are read one at a time. Every sequence that ends at the cursor is
/// paired with whatever ended right before it began; pairs that co-occur more
/// often than independence predicts become tracked sequences themselves, so
/// longer patterns are built bottom-up from shorter ones. When the working
/// set outgrows `max_tracked`, the least significant half is evicted.
pub struct Seqt<T> {
    pub(crate) store: SequenceStore<T>,

    config: SeqtConfig,

    /// Set once an invariant violation leaves the store in an unknown state
    poisoned: bool,

    admitted_total: u64,
    evictions: u64,
    evicted_total: u64,
    last_iterations: usize,
}

impl<T: Hash + Eq + Clone> Seqt<T> {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::build(SeqtConfig::default())
    }

    /// Creates an engine with a validated configuration.
    pub fn with_config(config: SeqtConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SeqtConfig) -> Self {
        Self {
            store: SequenceStore::new(),
            config,
            poisoned: false,
            admitted_total: 0,
            evictions: 0,
            evicted_total: 0,
            last_iterations: 0,
        }
    }

    /// Reads one token, extending every sequence it completes.
    ///
    /// Runs to completion, including any eviction it triggers. An error means
    /// an internal invariant broke; the engine rejects all further input.
    pub fn ingest(&mut self, token: T) -> Result<()> {
        if self.poisoned {
            return Err(SeqtError::Poisoned);
        }

        let result = self.ingest_token(token);
        if let Err(err) = &result {
            warn!(error = %err, position = self.store.characters_read, "ingest aborted");
            self.poisoned = true;
        }
        result
    }

    /// Ingests every token in order, stopping at the first failure.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<()> {
        for token in iter {
            self.ingest(token)?;
        }
        Ok(())
    }

    fn ingest_token(&mut self, token: T) -> Result<()> {
        let store = &mut self.store;

        store.advance_recency();
        let index = store.intern_token_atom(token);
        store.recompute_significance();
        store.characters_read += 1;

        let mut active = vec![false; store.total()];
        let eligible = store.currently_eligible(index);
        bulk::scatter_value(&eligible, true, &mut active);

        let mut capacity_pressure = false;
        let mut iterations = 0;
        let mut admitted = 0;

        loop {
            iterations += 1;

            let current = bulk::pack(&active, |&a| a);
            let candidates = store.find_candidates(&current);
            if candidates.is_empty() {
                break;
            }

            let mut fresh = Vec::new();
            let mut newly_active = 0;
            for (pair, found) in candidates.iter().zip(store.exists(&candidates)) {
                match found {
                    Some(id) => {
                        store.check_length(id)?;
                        if !active[id as usize] {
                            active[id as usize] = true;
                            newly_active += 1;
                        }
                    }
                    None => fresh.push(*pair),
                }
            }

            let mut admitted_now = 0;
            if !fresh.is_empty() && !capacity_pressure {
                if store.tracked() + fresh.len() > self.config.max_tracked {
                    trace!(
                        deferred = fresh.len(),
                        tracked = store.tracked(),
                        "capacity reached, deferring admissions"
                    );
                    capacity_pressure = true;
                } else {
                    let admissible: Vec<(u32, u32)> = fresh
                        .into_iter()
                        .filter(|&pair| store.admit(&self.config, pair))
                        .collect();

                    if !admissible.is_empty() {
                        let ids = store.append(&admissible, 0)?;
                        store.cache_renderings(&ids)?;
                        active.resize(store.total(), false);
                        bulk::scatter_value(&ids, true, &mut active);
                        admitted_now = ids.len();
                    }
                }
            }

            trace!(
                iteration = iterations,
                candidates = candidates.len(),
                admitted = admitted_now,
                activated = newly_active,
                "extend step"
            );
            admitted += admitted_now;

            if admitted_now == 0 && newly_active == 0 {
                break;
            }
        }

        let completed = bulk::pack(&active, |&a| a);
        store.confirm_occurrences(&completed);

        debug!(
            position = store.characters_read,
            completed = completed.len(),
            admitted,
            iterations,
            total = store.total(),
            "token ingested"
        );

        self.admitted_total += admitted as u64;
        self.last_iterations = iterations;

        if capacity_pressure || store.tracked() > self.config.max_tracked {
            let report = store.evict(store.total() / 2, self.config.min_sigma)?;
            self.evictions += 1;
            self.evicted_total += (report.before - report.after) as u64;
        }

        Ok(())
    }

    /// Number of tokens ingested.
    pub fn len(&self) -> usize {
        self.store.characters_read as usize
    }

    /// Returns true if no tokens have been ingested.
    pub fn is_empty(&self) -> bool {
        self.store.characters_read == 0
    }

    pub fn config(&self) -> &SeqtConfig {
        &self.config
    }

    /// Returns true once an invariant violation has stopped the engine.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Returns running statistics.
    pub fn stats(&self) -> EngineStats {
        let tracked = self.store.tracked();
        let atoms = self.store.atom_count();
        EngineStats {
            characters_read: self.store.characters_read,
            tracked,
            atoms,
            composites: tracked - atoms,
            admitted_total: self.admitted_total,
            evictions: self.evictions,
            evicted_total: self.evicted_total,
            last_iterations: self.last_iterations,
        }
    }
}

/// Running statistics about the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Tokens ingested
    pub characters_read: u64,
    /// Tracked sequences, atoms and composites
    pub tracked: usize,
    /// Tracked atoms
    pub atoms: usize,
    /// Tracked composites
    pub composites: usize,
    /// Composites admitted over the engine's lifetime
    pub admitted_total: u64,
    /// Eviction passes run
    pub evictions: u64,
    /// Rows removed across all eviction passes
    pub evicted_total: u64,
    /// Extension rounds used by the most recent token
    pub last_iterations: usize,
}

impl<T: Hash + Eq + Clone> Default for Seqt<T> {
    fn default() -> Self {
        Self::new()
    }
}
