//! Errors surfaced by node operations.

use bk_01_chain_storage::StorageError;
use shared_types::{ChainError, SerializationError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NodeError {
    /// A block did not extend the current tail. The chain is unchanged.
    #[error("Chain invariant violated: {0}")]
    InvariantViolation(#[from] ChainError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    /// The chain backend could not be read or written. Not retried.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StorageError),

    /// A peer mailbox was closed or full past the timeout, or a vote never
    /// arrived.
    #[error("Peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    /// The node's actor task has exited.
    #[error("Node {node_id} has stopped")]
    ActorStopped { node_id: String },

    #[error("Invalid node configuration: {0}")]
    InvalidConfig(String),
}

impl NodeError {
    pub(crate) fn unreachable(peer: &str, reason: impl Into<String>) -> Self {
        Self::PeerUnreachable {
            peer: peer.to_string(),
            reason: reason.into(),
        }
    }
}
