//! Error types for the sequence tracker.

use thiserror::Error;

/// Failures surfaced by [`Seqt`](crate::Seqt).
///
/// Every variant except `InvalidConfig` marks a broken internal invariant.
/// Once one is returned from `ingest` the engine refuses further input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqtError {
    #[error("length mismatch at row {id}: stored {stored}, children sum to {expected}")]
    LengthMismatch { id: u32, stored: u64, expected: u64 },

    #[error("composition ({left}, {right}) is already tracked as row {existing}")]
    DuplicateComposition { left: u32, right: u32, existing: u32 },

    #[error("row {id} references dropped row {child}")]
    DanglingReference { id: u32, child: u32 },

    #[error("eviction closure flagged {flagged} rows, below the target of {target}")]
    EvictionShrank { flagged: usize, target: usize },

    #[error("atom row {0} has no token in the alphabet")]
    AlphabetDesync(u32),

    #[error("row {id} is out of range (total {total})")]
    UnknownSequence { id: u32, total: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("engine poisoned by an earlier invariant violation")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, SeqtError>;

impl SeqtError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Returns true for errors that leave the store in an unknown state.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SeqtError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SeqtError::DanglingReference { id: 7, child: 3 };
        assert_eq!(err.to_string(), "row 7 references dropped row 3");

        let err = SeqtError::invalid_config("sigma must be finite");
        assert_eq!(err.to_string(), "invalid config: sigma must be finite");
    }

    #[test]
    fn test_fatality() {
        assert!(!SeqtError::invalid_config("x").is_fatal());
        assert!(SeqtError::Poisoned.is_fatal());
        assert!(SeqtError::AlphabetDesync(4).is_fatal());
    }
}
