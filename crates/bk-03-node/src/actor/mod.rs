//! The node actor: one tokio task per node, fed by a bounded mailbox.
//!
//! The task handles one message per turn. Chain gossip rounds are the only
//! work that outlives a turn: offers are enqueued during the turn, and the
//! votes are awaited on a [`FuturesOrdered`] queue polled alongside the
//! mailbox. A voting peer may therefore call back into this node while a
//! round is open.
//!
//! Rounds are applied in the order their chains were offered, whatever order
//! their votes arrive in. A later round on the same tip only ever sees the
//! outcome of the earlier ones.

mod handle;
mod messages;

pub use handle::NodeHandle;

use crate::domain::{NodeConfig, NodeError, ShareOutcome};
use crate::ports::{Clock, SystemClock};
use crate::service::{CompletedRound, NodeService, PendingRound};
use bk_01_chain_storage::ChainBackend;
use messages::{NodeMessage, Reply};
use futures::future::BoxFuture;
use futures::stream::{FuturesOrdered, StreamExt};
use futures::FutureExt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

type ShareReply = Reply<Result<ShareOutcome, NodeError>>;
type Rounds = FuturesOrdered<BoxFuture<'static, (CompletedRound, Option<ShareReply>)>>;

/// Spawns node actors.
pub struct NodeActor {
    service: NodeService,
}

impl NodeActor {
    /// Start a node on the current tokio runtime.
    pub fn spawn(
        node_id: impl Into<String>,
        backend: Arc<dyn ChainBackend>,
        config: NodeConfig,
    ) -> Result<NodeHandle, NodeError> {
        Self::spawn_with_clock(node_id, backend, config, Arc::new(SystemClock))
    }

    pub fn spawn_with_clock(
        node_id: impl Into<String>,
        backend: Arc<dyn ChainBackend>,
        config: NodeConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<NodeHandle, NodeError> {
        let node_id = node_id.into();
        if node_id.is_empty() {
            return Err(NodeError::InvalidConfig("node id must not be empty".into()));
        }
        config.validate()?;

        let (sender, mailbox) = mpsc::channel(config.mailbox_capacity);
        let handle = NodeHandle::new(&node_id, sender);
        info!(
            node_id = %node_id,
            block_size = config.block_size,
            peer_timeout_ms = config.peer_timeout.as_millis() as u64,
            "[bk-03] 🚀 Node started"
        );

        let actor = Self {
            service: NodeService::new(node_id, config, backend, clock),
        };
        tokio::spawn(actor.run(mailbox));
        Ok(handle)
    }

    async fn run(mut self, mut mailbox: mpsc::Receiver<NodeMessage>) {
        let mut rounds = Rounds::new();
        let mut stop_reply = None;

        loop {
            tokio::select! {
                message = mailbox.recv() => match message {
                    Some(message) => {
                        if let ControlFlow::Break(reply) = self.handle(message, &mut rounds).await {
                            stop_reply = Some(reply);
                            break;
                        }
                    }
                    None => break,
                },
                Some((round, reply)) = rounds.next(), if !rounds.is_empty() => {
                    self.finish_round(round, reply);
                }
            }
        }

        // Open rounds are dropped with their replies.
        drop(rounds);
        drop(mailbox);
        info!(node_id = %self.service.node_id(), "[bk-03] 🛑 Node stopped");
        if let Some(reply) = stop_reply {
            let _ = reply.send(());
        }
    }

    async fn handle(&mut self, message: NodeMessage, rounds: &mut Rounds) -> ControlFlow<Reply<()>> {
        match message {
            NodeMessage::RegisterPeer { peer, reply } => {
                self.service.register_peer(peer);
                let _ = reply.send(());
            }
            NodeMessage::RegisterTransaction { transaction, reply } => {
                let result = self
                    .service
                    .register_transaction(transaction)
                    .await
                    .map(|intake| {
                        if let Some(round) = intake.round {
                            start_round(rounds, round, None);
                        }
                        intake.registration
                    });
                let _ = reply.send(result);
            }
            NodeMessage::GossipTransaction { transaction } => {
                match self.service.register_transaction(transaction).await {
                    Ok(intake) => {
                        if let Some(round) = intake.round {
                            start_round(rounds, round, None);
                        }
                    }
                    Err(e) => warn!(
                        node_id = %self.service.node_id(),
                        error = %e,
                        "[bk-03] Gossiped transaction failed"
                    ),
                }
            }
            NodeMessage::ReceiveChain { chain, reply } => {
                let _ = reply.send(self.service.receive_chain(chain));
            }
            NodeMessage::ShareChain { reply } => match self.service.share_chain().await {
                Ok(round) => start_round(rounds, round, Some(reply)),
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            },
            NodeMessage::Chain { reply } => {
                let _ = reply.send(self.service.chain());
            }
            NodeMessage::PendingTransactions { reply } => {
                let _ = reply.send(self.service.pending_transactions());
            }
            NodeMessage::PeerProxies { reply } => {
                let _ = reply.send(self.service.peer_proxies());
            }
            NodeMessage::ShouldMine { reply } => {
                let _ = reply.send(self.service.should_mine());
            }
            NodeMessage::Stop { reply } => return ControlFlow::Break(reply),
        }
        ControlFlow::Continue(())
    }

    fn finish_round(&mut self, round: CompletedRound, reply: Option<ShareReply>) {
        let outcome = self.service.finish_round(round);
        match reply {
            Some(reply) => {
                let _ = reply.send(outcome);
            }
            None => {
                if let Err(e) = outcome {
                    error!(
                        node_id = %self.service.node_id(),
                        error = %e,
                        "[bk-03] Applying chain round failed"
                    );
                }
            }
        }
    }
}

fn start_round(rounds: &mut Rounds, round: PendingRound, reply: Option<ShareReply>) {
    rounds.push_back(async move { (round.collect().await, reply) }.boxed());
}
