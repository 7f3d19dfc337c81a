//! Node service: the state machine run by one actor turn at a time.
//!
//! Nothing here is shared. The actor owns a `NodeService` and feeds it one
//! message at a time, so no locking is needed. Peers are only ever reached
//! through [`PeerGateway`], which enqueues and returns.

use crate::domain::{batch, NodeConfig, NodeError, PendingPool, Registration, ShareOutcome};
use crate::peers::PeerSet;
use crate::ports::{Clock, PeerGateway, VoteReceiver};
use bk_01_chain_storage::ChainBackend;
use bk_02_consensus::{longest_chain_rule, PeerResponse, Vote, VoteTally};
use shared_types::{Block, Chain, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one intake turn.
pub(crate) struct Intake {
    pub registration: Registration,
    /// Votes still to be collected when the turn mined a block.
    pub round: Option<PendingRound>,
}

impl Intake {
    fn ignored(registration: Registration) -> Self {
        Self {
            registration,
            round: None,
        }
    }
}

/// A chain offered to every peer whose votes are still outstanding.
pub(crate) struct PendingRound {
    node_id: String,
    offered_tip: Option<String>,
    offers: Vec<(String, Result<VoteReceiver, NodeError>)>,
    peer_timeout: Duration,
}

/// Votes collected for one offered chain.
#[derive(Debug)]
pub(crate) struct CompletedRound {
    pub offered_tip: Option<String>,
    pub tally: VoteTally,
}

impl PendingRound {
    /// Await every vote in parallel. Each peer gets `peer_timeout`.
    pub async fn collect(self) -> CompletedRound {
        let Self {
            node_id,
            offered_tip,
            offers,
            peer_timeout,
        } = self;

        let votes = offers.into_iter().map(|(peer, offer)| {
            let node_id = node_id.as_str();
            async move {
                let error = match offer {
                    Err(e) => e,
                    Ok(receiver) => match tokio::time::timeout(peer_timeout, receiver).await {
                        Ok(Ok(Ok(vote))) => return PeerResponse::Voted(vote),
                        Ok(Ok(Err(e))) => e,
                        Ok(Err(_)) => NodeError::unreachable(&peer, "vote dropped"),
                        Err(_) => NodeError::unreachable(&peer, "vote timed out"),
                    },
                };
                warn!(
                    node_id = node_id,
                    peer = %peer,
                    error = %error,
                    "[bk-03] Peer excluded from vote tally"
                );
                PeerResponse::Unreachable
            }
        });
        let tally: VoteTally = futures::future::join_all(votes).await.into_iter().collect();

        CompletedRound { offered_tip, tally }
    }
}

/// Per-node state and the operations on it.
pub(crate) struct NodeService {
    node_id: String,
    config: NodeConfig,
    backend: Arc<dyn ChainBackend>,
    clock: Arc<dyn Clock>,
    pool: PendingPool,
    peers: PeerSet,
}

impl NodeService {
    pub fn new(
        node_id: String,
        config: NodeConfig,
        backend: Arc<dyn ChainBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            node_id,
            config,
            backend,
            clock,
            pool: PendingPool::new(),
            peers: PeerSet::new(),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Read-through: never cached between calls.
    pub fn chain(&self) -> Result<Chain, NodeError> {
        Ok(self.backend.load_chain(&self.node_id)?)
    }

    pub fn pending_transactions(&self) -> HashMap<String, Transaction> {
        self.pool.snapshot()
    }

    pub fn peer_proxies(&self) -> Vec<String> {
        self.peers.ids()
    }

    pub fn should_mine(&self) -> bool {
        self.pool.len() >= self.config.block_size
    }

    // =========================================================================
    // PEERS AND TRANSACTIONS
    // =========================================================================

    pub fn register_peer(&mut self, peer: Arc<dyn PeerGateway>) {
        info!(
            node_id = %self.node_id,
            peer = peer.peer_id(),
            "[bk-03] 🤝 Registered peer"
        );
        self.peers.register(peer);
    }

    /// Dedup, pool, mine if the pool is full, then gossip.
    ///
    /// Mining runs before the gossip so every peer receives the offered chain
    /// ahead of the transaction that completed it. A mining failure leaves
    /// the transaction pending and is returned after the gossip went out.
    pub async fn register_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Intake, NodeError> {
        let hash = transaction.hash();
        if self.pool.contains(&hash) {
            debug!(node_id = %self.node_id, tx = %hash, "[bk-03] Duplicate transaction ignored");
            return Ok(Intake::ignored(Registration::Duplicate));
        }

        let chain = self.chain()?;
        if batch::chain_contains(&chain, &hash) {
            debug!(node_id = %self.node_id, tx = %hash, "[bk-03] Transaction already in chain");
            return Ok(Intake::ignored(Registration::AlreadyIncluded));
        }

        self.pool.insert(hash.clone(), transaction.clone());
        debug!(
            node_id = %self.node_id,
            tx = %hash,
            pending = self.pool.len(),
            "[bk-03] 📥 Transaction pooled"
        );

        let mined = if self.should_mine() {
            self.mine_block(chain).await.map(Some)
        } else {
            Ok(None)
        };

        self.share_transaction(&transaction).await;

        Ok(Intake {
            registration: Registration::Added,
            round: mined?,
        })
    }

    async fn share_transaction(&self, transaction: &Transaction) {
        for peer in self.peers.iter() {
            if let Err(e) = peer
                .gossip_transaction(transaction.clone(), self.config.peer_timeout)
                .await
            {
                warn!(
                    node_id = %self.node_id,
                    peer = peer.peer_id(),
                    error = %e,
                    "[bk-03] Transaction gossip skipped peer"
                );
            }
        }
    }

    // =========================================================================
    // MINING
    // =========================================================================

    /// Batch the whole pool into a block on top of `chain`, persist, then
    /// offer the new chain to every peer.
    async fn mine_block(&mut self, mut chain: Chain) -> Result<PendingRound, NodeError> {
        let now = self.clock.now();
        let timestamp = match chain.latest_block() {
            Some(tip) if tip.timestamp() > now => tip.timestamp(),
            _ => now,
        };
        let block = Block::new(
            timestamp,
            chain.latest_hash().map(str::to_string),
            batch::encode(self.pool.transactions()),
        );
        let block_hash = block.hash().to_string();

        chain.add_block(block)?;
        self.backend.save_chain(&chain, &self.node_id)?;
        let mined = self.pool.mark_mined(&block_hash);

        info!(
            node_id = %self.node_id,
            height = chain.len(),
            block_hash = %block_hash,
            transactions = mined,
            "[bk-03] ⛏️ Mined block"
        );
        Ok(self.offer_chain(chain).await)
    }

    // =========================================================================
    // CHAIN GOSSIP
    // =========================================================================

    /// Offer the current chain to every peer.
    pub async fn share_chain(&self) -> Result<PendingRound, NodeError> {
        let chain = self.chain()?;
        Ok(self.offer_chain(chain).await)
    }

    async fn offer_chain(&self, chain: Chain) -> PendingRound {
        let offered_tip = chain.latest_hash().map(str::to_string);
        let mut offers = Vec::with_capacity(self.peers.len());
        for peer in self.peers.iter() {
            let offer = peer
                .offer_chain(chain.clone(), self.config.peer_timeout)
                .await;
            offers.push((peer.peer_id().to_string(), offer));
        }

        debug!(
            node_id = %self.node_id,
            height = chain.len(),
            peers = offers.len(),
            "[bk-03] 📡 Chain offered"
        );
        PendingRound {
            node_id: self.node_id.clone(),
            offered_tip,
            offers,
            peer_timeout: self.config.peer_timeout,
        }
    }

    /// Apply a finished round: confirm the offered tip, or roll it back when
    /// the voters repudiated it.
    pub fn finish_round(&mut self, round: CompletedRound) -> Result<ShareOutcome, NodeError> {
        let CompletedRound { offered_tip, tally } = round;

        if !tally.is_repudiated(&self.config.consensus) {
            if let Some(tip) = offered_tip.as_deref().filter(|_| tally.total() > 0) {
                self.pool.confirm(tip);
            }
            info!(
                node_id = %self.node_id,
                accepted = tally.accepted,
                rejected = tally.rejected,
                unreachable = tally.unreachable,
                "[bk-03] 🗳️ Chain round closed"
            );
            return Ok(ShareOutcome {
                tally,
                rolled_back: false,
            });
        }

        warn!(
            node_id = %self.node_id,
            accepted = tally.accepted,
            rejected = tally.rejected,
            unreachable = tally.unreachable,
            "[bk-03] 🗳️ Chain repudiated by peers"
        );
        let rolled_back = match offered_tip {
            Some(tip) => self.roll_back(&tip)?,
            None => false,
        };
        Ok(ShareOutcome { tally, rolled_back })
    }

    /// Remove `tip` if it is still this node's unconfirmed tail block.
    fn roll_back(&mut self, tip: &str) -> Result<bool, NodeError> {
        if !self.pool.is_unconfirmed(tip) {
            debug!(node_id = %self.node_id, tip = %tip, "[bk-03] Offered tip is not an unconfirmed local block");
            return Ok(false);
        }

        let mut chain = self.chain()?;
        if chain.latest_hash() != Some(tip) {
            info!(node_id = %self.node_id, tip = %tip, "[bk-03] Tip moved since the offer, no rollback");
            return Ok(false);
        }

        chain.remove_latest_block();
        self.backend.save_chain(&chain, &self.node_id)?;
        let restored = self.pool.restore(tip, &chain);

        warn!(
            node_id = %self.node_id,
            block_hash = %tip,
            height = chain.len(),
            restored = restored,
            "[bk-03] ↩️ Rolled back repudiated block"
        );
        Ok(true)
    }

    /// Longest-chain rule. Adopting prunes the pool of recorded transactions.
    pub fn receive_chain(&mut self, incoming: Chain) -> Result<Vote, NodeError> {
        let local = self.chain()?;
        let vote = longest_chain_rule(&local, &incoming);

        match vote {
            Vote::Accepted => {
                self.backend.save_chain(&incoming, &self.node_id)?;
                let pruned = self.pool.reconcile(&incoming);
                info!(
                    node_id = %self.node_id,
                    from = local.len(),
                    to = incoming.len(),
                    pruned = pruned,
                    "[bk-03] 🔗 Adopted longer chain"
                );
            }
            Vote::Rejected => debug!(
                node_id = %self.node_id,
                local = local.len(),
                incoming = incoming.len(),
                "[bk-03] Rejected chain that is not longer"
            ),
        }
        Ok(vote)
    }
}
