//! Node configuration.

use super::errors::NodeError;
use bk_02_consensus::ConsensusConfig;
use std::time::Duration;

/// Pending transactions needed to trigger mining.
pub const DEFAULT_BLOCK_SIZE: usize = 5;

/// Upper bound on one peer interaction (enqueue or vote).
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Messages buffered per node before senders wait.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Per-node configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Mine once the pending pool holds at least this many transactions.
    pub block_size: usize,
    /// Applied to every enqueue into a peer mailbox and to every awaited vote.
    pub peer_timeout: Duration,
    pub mailbox_capacity: usize,
    pub consensus: ConsensusConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            consensus: ConsensusConfig::default(),
        }
    }
}

impl NodeConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_peer_timeout(mut self, peer_timeout: Duration) -> Self {
        self.peer_timeout = peer_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.block_size == 0 {
            return Err(NodeError::InvalidConfig("block_size must be at least 1".into()));
        }
        if self.mailbox_capacity == 0 {
            return Err(NodeError::InvalidConfig(
                "mailbox_capacity must be at least 1".into(),
            ));
        }
        if self.peer_timeout.is_zero() {
            return Err(NodeError::InvalidConfig("peer_timeout must be non-zero".into()));
        }
        self.consensus
            .validate()
            .map_err(|e| NodeError::InvalidConfig(e.to_string()))
    }
}
