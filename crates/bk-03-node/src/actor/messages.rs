//! Mailbox protocol.

use crate::domain::{NodeError, Registration, ShareOutcome};
use crate::ports::PeerGateway;
use bk_02_consensus::Vote;
use shared_types::{Chain, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

pub(crate) type Reply<T> = oneshot::Sender<T>;

/// One unit of work for a node. Requests that need an answer carry a reply
/// channel; gossip from peers does not.
pub(crate) enum NodeMessage {
    RegisterPeer {
        peer: Arc<dyn PeerGateway>,
        reply: Reply<()>,
    },
    RegisterTransaction {
        transaction: Transaction,
        reply: Reply<Result<Registration, NodeError>>,
    },
    /// Fire-and-forget intake from a peer.
    GossipTransaction { transaction: Transaction },
    ReceiveChain {
        chain: Chain,
        reply: Reply<Result<Vote, NodeError>>,
    },
    /// Answered once the round's votes are in and applied.
    ShareChain {
        reply: Reply<Result<ShareOutcome, NodeError>>,
    },
    Chain {
        reply: Reply<Result<Chain, NodeError>>,
    },
    PendingTransactions {
        reply: Reply<HashMap<String, Transaction>>,
    },
    PeerProxies {
        reply: Reply<Vec<String>>,
    },
    ShouldMine {
        reply: Reply<bool>,
    },
    Stop {
        reply: Reply<()>,
    },
}
