//! # Outbound Port (Driven Port)
//!
//! The persistence capability the node core consumes but never implements.

use crate::domain::StorageError;
use shared_types::Chain;

/// Abstract chain persistence keyed by node identity.
///
/// Production: [`crate::FileChainBackend`]
/// Testing: [`crate::InMemoryChainBackend`]
pub trait ChainBackend: Send + Sync {
    /// Store `chain` as the complete record for `node_id`, replacing any
    /// previous record.
    fn save_chain(&self, chain: &Chain, node_id: &str) -> Result<(), StorageError>;

    /// Read the current record for `node_id`.
    ///
    /// A node that never saved loads as the empty chain.
    fn load_chain(&self, node_id: &str) -> Result<Chain, StorageError>;
}
