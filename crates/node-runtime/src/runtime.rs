//! In-process network of node actors.

use bk_01_chain_storage::ChainBackend;
use bk_03_node::{NodeActor, NodeError, NodeHandle, Registration};
use shared_types::Transaction;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RuntimeConfig;

/// Running nodes, peered as a full mesh.
pub struct NodeRuntime {
    nodes: Vec<NodeHandle>,
    next: usize,
}

impl NodeRuntime {
    /// Spawn one actor per configured id against a shared backend and register
    /// every node with every other node.
    pub async fn start(
        config: &RuntimeConfig,
        backend: Arc<dyn ChainBackend>,
    ) -> Result<Self, NodeError> {
        if config.node_ids.is_empty() {
            return Err(NodeError::InvalidConfig("no node ids configured".into()));
        }
        let nodes = config
            .node_ids
            .iter()
            .map(|id| NodeActor::spawn(id.as_str(), Arc::clone(&backend), config.node.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        for node in &nodes {
            for peer in nodes.iter().filter(|p| p.node_id() != node.node_id()) {
                node.register_peer(peer.clone()).await?;
            }
        }

        for node in &nodes {
            let len = node.chain().await?.len();
            info!(node_id = %node.node_id(), chain_len = len, "Node ready");
        }
        info!(nodes = nodes.len(), "All nodes peered as a full mesh");

        Ok(Self { nodes, next: 0 })
    }

    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    /// Submit to the next node in round-robin order.
    pub async fn submit(
        &mut self,
        transaction: Transaction,
    ) -> Result<(String, Registration), NodeError> {
        let node = &self.nodes[self.next % self.nodes.len()];
        self.next = self.next.wrapping_add(1);

        let hash = transaction.hash();
        let registration = node.register_transaction(transaction).await?;
        info!(
            node_id = %node.node_id(),
            tx_hash = %hash,
            registration = ?registration,
            "Transaction submitted"
        );
        Ok((node.node_id().to_string(), registration))
    }

    /// `(node_id, chain length)` for every node.
    pub async fn chain_lengths(&self) -> Result<Vec<(String, usize)>, NodeError> {
        let mut lengths = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            lengths.push((node.node_id().to_string(), node.chain().await?.len()));
        }
        Ok(lengths)
    }

    /// Log final chain lengths and stop every node.
    pub async fn shutdown(self) -> Result<Vec<(String, usize)>, NodeError> {
        info!("Initiating graceful shutdown...");
        let lengths = self.chain_lengths().await?;
        for (node_id, len) in &lengths {
            info!(node_id = %node_id, chain_len = *len, "Final chain");
        }

        for node in &self.nodes {
            if let Err(e) = node.stop().await {
                warn!(node_id = %node.node_id(), error = %e, "Node already stopped");
            }
        }
        info!("Shutdown complete");
        Ok(lengths)
    }
}
