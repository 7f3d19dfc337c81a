use crate::domain::StorageError;
use crate::ports::ChainBackend;
use parking_lot::RwLock;
use serde_json::Value;
use shared_types::{Canonical, Chain};
use std::collections::HashMap;

/// In-memory chain store for unit tests and single-process demos.
///
/// Records are held as canonical documents, so a loaded chain never shares
/// anything with the chain that was saved.
#[derive(Default)]
pub struct InMemoryChainBackend {
    records: RwLock<HashMap<String, Value>>,
    saves: RwLock<HashMap<String, usize>>,
}

impl InMemoryChainBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without counting it as a save.
    pub fn with_chain(self, node_id: impl Into<String>, chain: &Chain) -> Self {
        self.records
            .write()
            .insert(node_id.into(), chain.to_canonical());
        self
    }

    /// Number of `save_chain` calls made for `node_id`.
    pub fn save_count(&self, node_id: &str) -> usize {
        self.saves.read().get(node_id).copied().unwrap_or(0)
    }

    /// Node ids that currently have a record.
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.records.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ChainBackend for InMemoryChainBackend {
    fn save_chain(&self, chain: &Chain, node_id: &str) -> Result<(), StorageError> {
        self.records
            .write()
            .insert(node_id.to_string(), chain.to_canonical());
        *self.saves.write().entry(node_id.to_string()).or_default() += 1;
        Ok(())
    }

    fn load_chain(&self, node_id: &str) -> Result<Chain, StorageError> {
        match self.records.read().get(node_id) {
            None => Ok(Chain::new()),
            Some(doc) => Chain::from_canonical(doc).map_err(|source| StorageError::Corrupt {
                node_id: node_id.to_string(),
                source,
            }),
        }
    }
}
