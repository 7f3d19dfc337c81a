//! Storage error types.

use shared_types::SerializationError;
use thiserror::Error;

/// Errors raised by a [`crate::ChainBackend`].
///
/// Callers in the node core surface every variant as "persistence
/// unavailable"; no variant is retried.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Filesystem read or write failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// A stored record exists but is not a valid chain document.
    #[error("Stored chain for node {node_id} is corrupt: {source}")]
    Corrupt {
        node_id: String,
        #[source]
        source: SerializationError,
    },

    /// The node id cannot be used as a storage key.
    #[error("Invalid node id {0:?}")]
    InvalidNodeId(String),

    /// The backend cannot serve requests at all.
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
