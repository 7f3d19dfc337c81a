//! Pending pool with mined-but-unconfirmed tracking.
//!
//! ```text
//! [PENDING] ──mine──→ [MINED, UNCONFIRMED] ──round not repudiated──→ [RECORDED]
//!                            │
//!                            └── round repudiated ──→ [PENDING]
//! ```
//!
//! Mining moves the whole pending set under the new block's hash. A
//! repudiated block hands its transactions back; a confirmed or superseded
//! block just forgets them, since they now live in the chain or were lost
//! with a discarded fork.

use shared_types::{Chain, Transaction};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct PendingPool {
    pending: HashMap<String, Transaction>,
    /// Block hash -> transactions mined into it.
    unconfirmed: HashMap<String, Vec<Transaction>>,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.pending.contains_key(hash)
    }

    /// Insert under `hash`. Returns false if already pending.
    pub fn insert(&mut self, hash: String, tx: Transaction) -> bool {
        if self.pending.contains_key(&hash) {
            return false;
        }
        self.pending.insert(hash, tx);
        true
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.pending.values()
    }

    pub fn snapshot(&self) -> HashMap<String, Transaction> {
        self.pending.clone()
    }

    /// Move every pending transaction under `block_hash`.
    pub fn mark_mined(&mut self, block_hash: &str) -> usize {
        let mined: Vec<Transaction> = self.pending.drain().map(|(_, tx)| tx).collect();
        let count = mined.len();
        self.unconfirmed.insert(block_hash.to_string(), mined);
        count
    }

    pub fn is_unconfirmed(&self, block_hash: &str) -> bool {
        self.unconfirmed.contains_key(block_hash)
    }

    /// The block survived a round; its transactions stay in the chain.
    pub fn confirm(&mut self, block_hash: &str) -> bool {
        self.unconfirmed.remove(block_hash).is_some()
    }

    /// The block was rolled back: re-admit its transactions unless `chain`
    /// already records them. Returns how many were re-admitted.
    pub fn restore(&mut self, block_hash: &str, chain: &Chain) -> usize {
        let Some(mined) = self.unconfirmed.remove(block_hash) else {
            return 0;
        };
        let recorded = super::batch::chain_hashes(chain);
        let mut count = 0;
        for tx in mined {
            let hash = tx.hash();
            if !recorded.contains(&hash) && self.insert(hash, tx) {
                count += 1;
            }
        }
        count
    }

    /// A chain was adopted: drop pending transactions it records and stop
    /// tracking mined blocks it does not contain.
    pub fn reconcile(&mut self, adopted: &Chain) -> usize {
        let recorded = super::batch::chain_hashes(adopted);
        let before = self.pending.len();
        self.pending.retain(|hash, _| !recorded.contains(hash));

        let kept: HashSet<&str> = adopted.blocks().iter().map(|b| b.hash()).collect();
        self.unconfirmed
            .retain(|block_hash, _| kept.contains(block_hash.as_str()));
        before - self.pending.len()
    }
}
