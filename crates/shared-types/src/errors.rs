//! # Error Types
//!
//! Errors raised by the entity model itself.

use thiserror::Error;

/// Errors raised when mutating a [`crate::Chain`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The appended block does not link to the current tail.
    ///
    /// The chain is left unchanged.
    #[error("Invariant violation: block prev_hash {actual:?} does not match chain tail {expected:?}")]
    InvariantViolation {
        /// Hash of the current tail (`None` for an empty chain).
        expected: Option<String>,
        /// `prev_hash` carried by the rejected block.
        actual: Option<String>,
    },
}

/// Errors raised while decoding a canonical document.
///
/// Decoding never produces a partial entity: the first problem found is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// Input is not valid JSON, or does not have the entity's shape: a
    /// missing or unknown field, a wrong type, or a malformed timestamp.
    #[error("Malformed document: {0}")]
    Json(String),

    /// Timestamp is not in the fixed `YYYY-MM-DDTHH:MM:SS.ffffffZ` form.
    #[error("Invalid timestamp {value:?}: expected YYYY-MM-DDTHH:MM:SS.ffffffZ")]
    InvalidTimestamp { value: String },

    /// Amount is not a finite number.
    #[error("Invalid amount: must be a finite number")]
    InvalidAmount,

    /// A stored block hash disagrees with the hash recomputed from its inputs.
    #[error("Block hash mismatch: document says {stored}, contents hash to {computed}")]
    HashMismatch { stored: String, computed: String },

    /// Block at `index` does not link to its predecessor.
    #[error("Broken chain link at block {index}")]
    BrokenLink { index: usize },
}

impl From<serde_json::Error> for SerializationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
