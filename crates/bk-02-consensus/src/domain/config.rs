//! Consensus configuration.

use thiserror::Error;

/// Default fraction of rejecting votes above which a broadcast chain is
/// considered repudiated.
pub const DEFAULT_REJECTION_THRESHOLD: f64 = 0.5;

/// Consensus configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsensusError {
    /// Threshold outside `[0, 1)`.
    #[error("Rejection threshold must lie in [0, 1), got {0}")]
    InvalidThreshold(f64),
}

/// Consensus configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusConfig {
    /// A chain is repudiated when `rejected / total > rejection_threshold`.
    pub rejection_threshold: f64,
}

impl ConsensusConfig {
    /// A threshold of 1.0 or more could never be exceeded.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        if (0.0..1.0).contains(&self.rejection_threshold) {
            Ok(())
        } else {
            Err(ConsensusError::InvalidThreshold(self.rejection_threshold))
        }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            rejection_threshold: DEFAULT_REJECTION_THRESHOLD,
        }
    }
}
