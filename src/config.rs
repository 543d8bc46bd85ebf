use crate::error::{Result, SeqtError};

/// Tunables for a [`Seqt`](crate::Seqt) instance.
///
/// Supplied at construction and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeqtConfig {
    /// Minimum z-score a candidate pair needs to be admitted.
    pub sigma: f64,
    /// Minimum joint occurrences a candidate pair needs to be admitted.
    pub min_occurrences: u64,
    /// Working-set cap; exceeding it triggers eviction down to half.
    pub max_tracked: usize,
    /// Composites below this significance are dropped on every eviction pass.
    pub min_sigma: Option<f64>,
}

impl SeqtConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_min_occurrences(mut self, min_occurrences: u64) -> Self {
        self.min_occurrences = min_occurrences;
        self
    }

    pub fn with_max_tracked(mut self, max_tracked: usize) -> Self {
        self.max_tracked = max_tracked;
        self
    }

    pub fn with_min_sigma(mut self, min_sigma: f64) -> Self {
        self.min_sigma = Some(min_sigma);
        self
    }

    /// Checks that the values describe a usable engine.
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() {
            return Err(SeqtError::invalid_config(format!(
                "sigma must be finite, got {}",
                self.sigma
            )));
        }
        if let Some(floor) = self.min_sigma {
            if floor.is_nan() {
                return Err(SeqtError::invalid_config("min_sigma must not be NaN"));
            }
        }
        if self.max_tracked == 0 {
            return Err(SeqtError::invalid_config(format!(
                "max_tracked must be at least 1, got {}",
                self.max_tracked
            )));
        }
        Ok(())
    }
}

impl Default for SeqtConfig {
    fn default() -> Self {
        Self {
            sigma: 5.0,
            min_occurrences: 5,
            max_tracked: 1000,
            min_sigma: None,
        }
    }
}
