//! Cloneable address of a running node.

use super::messages::{NodeMessage, Reply};
use crate::domain::{NodeError, Registration, ShareOutcome};
use crate::ports::{PeerGateway, VoteReceiver};
use async_trait::async_trait;
use bk_02_consensus::Vote;
use shared_types::{Chain, Transaction};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::oneshot;

/// Handle to a node actor.
///
/// Every method is a message to the actor and resolves once the actor has
/// processed it. Calls fail with [`NodeError::ActorStopped`] after the actor
/// exits. The actor exits when [`stop`](Self::stop) is called or when every
/// handle is dropped. A peer registered with another node holds a handle, so
/// nodes peered with each other keep running until they are stopped.
#[derive(Clone)]
pub struct NodeHandle {
    node_id: Arc<str>,
    sender: mpsc::Sender<NodeMessage>,
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandle")
            .field("node_id", &self.node_id)
            .field("stopped", &self.sender.is_closed())
            .finish()
    }
}

impl NodeHandle {
    pub(crate) fn new(node_id: &str, sender: mpsc::Sender<NodeMessage>) -> Self {
        Self {
            node_id: node_id.into(),
            sender,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    fn stopped(&self) -> NodeError {
        NodeError::ActorStopped {
            node_id: self.node_id.to_string(),
        }
    }

    async fn ask<T>(&self, message: impl FnOnce(Reply<T>) -> NodeMessage) -> Result<T, NodeError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(message(reply))
            .await
            .map_err(|_| self.stopped())?;
        response.await.map_err(|_| self.stopped())
    }

    /// Add a peer to fan out to. Registration is one-directional.
    pub async fn register_peer<P: PeerGateway + 'static>(&self, peer: P) -> Result<(), NodeError> {
        let peer: Arc<dyn PeerGateway> = Arc::new(peer);
        self.ask(|reply| NodeMessage::RegisterPeer { peer, reply })
            .await
    }

    /// Submit a transaction.
    ///
    /// When the transaction fills the pool the node mines before replying.
    /// If that block cannot be persisted the error is returned, but the
    /// transaction stays pending and has already been gossiped: resubmitting
    /// it yields [`Registration::Duplicate`], and the next intake retries the
    /// mine.
    pub async fn register_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Registration, NodeError> {
        self.ask(|reply| NodeMessage::RegisterTransaction { transaction, reply })
            .await?
    }

    /// Vote on `chain`, adopting it if strictly longer than the local one.
    pub async fn receive_chain(&self, chain: Chain) -> Result<Vote, NodeError> {
        self.ask(|reply| NodeMessage::ReceiveChain { chain, reply })
            .await?
    }

    /// Offer the current chain to every peer and apply their votes.
    pub async fn share_chain(&self) -> Result<ShareOutcome, NodeError> {
        self.ask(|reply| NodeMessage::ShareChain { reply }).await?
    }

    pub async fn chain(&self) -> Result<Chain, NodeError> {
        self.ask(|reply| NodeMessage::Chain { reply }).await?
    }

    pub async fn pending_transactions(&self) -> Result<HashMap<String, Transaction>, NodeError> {
        self.ask(|reply| NodeMessage::PendingTransactions { reply })
            .await
    }

    /// Ids of registered peers, in registration order.
    pub async fn peer_proxies(&self) -> Result<Vec<String>, NodeError> {
        self.ask(|reply| NodeMessage::PeerProxies { reply }).await
    }

    pub async fn should_mine(&self) -> Result<bool, NodeError> {
        self.ask(|reply| NodeMessage::ShouldMine { reply }).await
    }

    /// Stop the actor after the messages already queued ahead of this one.
    pub async fn stop(&self) -> Result<(), NodeError> {
        self.ask(|reply| NodeMessage::Stop { reply }).await
    }

    async fn enqueue(&self, message: NodeMessage, timeout: Duration) -> Result<(), NodeError> {
        self.sender
            .send_timeout(message, timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => NodeError::unreachable(&self.node_id, "mailbox full"),
                SendTimeoutError::Closed(_) => NodeError::unreachable(&self.node_id, "node stopped"),
            })
    }
}

#[async_trait]
impl PeerGateway for NodeHandle {
    fn peer_id(&self) -> &str {
        &self.node_id
    }

    async fn gossip_transaction(
        &self,
        transaction: Transaction,
        timeout: Duration,
    ) -> Result<(), NodeError> {
        self.enqueue(NodeMessage::GossipTransaction { transaction }, timeout)
            .await
    }

    async fn offer_chain(&self, chain: Chain, timeout: Duration) -> Result<VoteReceiver, NodeError> {
        let (reply, vote) = oneshot::channel();
        self.enqueue(NodeMessage::ReceiveChain { chain, reply }, timeout)
            .await?;
        Ok(vote)
    }
}
