//! Shared builders for integration flows.

use bk_01_chain_storage::{ChainBackend, InMemoryChainBackend};
use bk_03_node::{NodeActor, NodeConfig, NodeHandle};
use rand::Rng;
use serde_json::json;
use shared_types::{Block, Chain, Timestamp, Transaction};
use std::sync::Arc;
use std::time::Duration;

/// Distinct transactions: `n` differs in the timestamp micros, amounts are
/// random.
pub fn transactions(count: u32) -> Vec<Transaction> {
    transactions_from(0, count)
}

pub fn transactions_from(first: u32, count: u32) -> Vec<Transaction> {
    let mut rng = rand::thread_rng();
    (first..first + count)
        .map(|n| {
            let ts = Timestamp::from_ymd_hms_micro(2017, 8, 9, 10, 11, 12, n).unwrap();
            let amount = rng.gen_range(1.0..1000.0_f64).round();
            Transaction::new(format!("seller-{n}"), format!("buyer-{n}"), ts, amount).unwrap()
        })
        .collect()
}

/// Chain of `len` blocks carrying non-transaction data.
pub fn linked_chain(len: u32) -> Chain {
    let mut chain = Chain::new();
    for n in 0..len {
        let ts = Timestamp::from_ymd_hms_micro(2017, 8, 9, 10, 11, 13 + n, 0).unwrap();
        let prev = chain.latest_hash().map(str::to_string);
        chain.add_block(Block::new(ts, prev, json!({"height": n}))).unwrap();
    }
    chain
}

pub fn shared_backend() -> Arc<dyn ChainBackend> {
    Arc::new(InMemoryChainBackend::new())
}

pub fn backend_with(node_id: &str, chain: &Chain) -> Arc<dyn ChainBackend> {
    Arc::new(InMemoryChainBackend::new().with_chain(node_id, chain))
}

pub fn spawn(id: &str, backend: &Arc<dyn ChainBackend>) -> NodeHandle {
    NodeActor::spawn(id, Arc::clone(backend), NodeConfig::default()).unwrap()
}

/// Register each node with the next one, the last with the first.
pub async fn ring(nodes: &[NodeHandle]) {
    for (i, node) in nodes.iter().enumerate() {
        let next = &nodes[(i + 1) % nodes.len()];
        node.register_peer(next.clone()).await.unwrap();
    }
}

pub async fn peer_both_ways(a: &NodeHandle, b: &NodeHandle) {
    a.register_peer(b.clone()).await.unwrap();
    b.register_peer(a.clone()).await.unwrap();
}

pub async fn eventually_pending(node: &NodeHandle, count: usize) {
    for _ in 0..200 {
        if node.pending_transactions().await.unwrap().len() == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} never held {count} pending transactions", node.node_id());
}

pub async fn eventually_chain(node: &NodeHandle, expected: &Chain) {
    for _ in 0..200 {
        if &node.chain().await.unwrap() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} never adopted the expected chain", node.node_id());
}
