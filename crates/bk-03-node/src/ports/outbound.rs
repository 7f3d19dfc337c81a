//! Driven ports: peers and time.

use crate::domain::NodeError;
use async_trait::async_trait;
use bk_02_consensus::Vote;
use shared_types::{Chain, Timestamp, Transaction};
use std::time::Duration;
use tokio::sync::oneshot;

/// Resolves to a peer's vote on an offered chain.
pub type VoteReceiver = oneshot::Receiver<Result<Vote, NodeError>>;

/// Addressable handle to another node.
///
/// Both calls only enqueue work at the peer and must give up after
/// `timeout`. Neither waits for the peer to process anything, so two nodes
/// peered with each other never wait on one another.
#[async_trait]
pub trait PeerGateway: Send + Sync {
    fn peer_id(&self) -> &str;

    /// Deliver a transaction to the peer's intake.
    async fn gossip_transaction(
        &self,
        transaction: Transaction,
        timeout: Duration,
    ) -> Result<(), NodeError>;

    /// Offer a chain for a vote. The vote arrives on the returned receiver.
    async fn offer_chain(&self, chain: Chain, timeout: Duration) -> Result<VoteReceiver, NodeError>;
}

/// Source of block timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        let now = SystemClock.now();
        assert!(now.as_datetime().timestamp() > 1_577_836_800); // 2020-01-01
    }
}
