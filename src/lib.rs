//! # Seqt - Online Significant-Sequence Discovery
//!
//! Reads a stream of tokens one at a time and grows a composition graph of the
//! subsequences that repeat more often than chance would explain.
//!
//! Every tracked sequence is either an atom (one input token) or a composite
//! of two tracked sequences that appeared back to back in the stream. For
//! each token the engine:
//! 1. **Extends**: pairs every sequence ending at the cursor with every
//!    sequence that ended exactly where it began, repeating until nothing new
//!    is found
//! 2. **Admits**: tracks a new pair only if its z-score against independence
//!    and its possible joint count clear the configured thresholds
//! 3. **Evicts**: once the working set outgrows `max_tracked`, drops the least
//!    significant half together with everything built on top of it
//!
//! ## Example
//!
//! ```
//! use seqt_rs::{Seqt, SeqtConfig};
//!
//! let config = SeqtConfig::new().with_sigma(0.0).with_min_occurrences(1);
//! let mut seqt = Seqt::with_config(config).unwrap();
//! seqt.extend("abab".chars()).unwrap();
//!
//! let snapshot = seqt.snapshot().unwrap();
//! let ab = snapshot.iter().find(|e| e.text() == "ab").unwrap();
//! assert_eq!(ab.count, 2);
//! ```
//!
//! ## Performance
//!
//! - Each token costs a constant number of whole-table passes per extension
//!   round, run on rayon with the default `parallel` feature
//! - Memory is bounded by `max_tracked` rows plus their rendered tokens

mod alphabet;
mod bulk;
mod candidates;
mod config;
mod error;
mod eviction;
mod recency;
mod render;
mod seqt;
mod significance;
mod snapshot;
mod store;

#[cfg(test)]
mod tests;

pub use config::SeqtConfig;
pub use error::{Result, SeqtError};
pub use seqt::{EngineStats, Seqt};
pub use snapshot::SnapshotEntry;
