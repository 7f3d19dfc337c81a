//! Failure-injecting backends.

use crate::adapters::InMemoryChainBackend;
use crate::domain::StorageError;
use crate::ports::ChainBackend;
use shared_types::Chain;
use std::sync::atomic::{AtomicBool, Ordering};

/// Backend that fails loads and/or saves on demand, delegating to an
/// in-memory store otherwise.
#[derive(Default)]
pub struct FailingChainBackend {
    inner: InMemoryChainBackend,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl FailingChainBackend {
    /// Every call fails.
    pub fn unavailable() -> Self {
        let backend = Self::default();
        backend.set_fail_loads(true);
        backend.set_fail_saves(true);
        backend
    }

    /// Loads succeed against `inner`; saves fail.
    pub fn failing_saves(inner: InMemoryChainBackend) -> Self {
        let backend = Self {
            inner,
            ..Self::default()
        };
        backend.set_fail_saves(true);
        backend
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryChainBackend {
        &self.inner
    }
}

impl ChainBackend for FailingChainBackend {
    fn save_chain(&self, chain: &Chain, node_id: &str) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("save for {node_id} refused")));
        }
        self.inner.save_chain(chain, node_id)
    }

    fn load_chain(&self, node_id: &str) -> Result<Chain, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("load for {node_id} refused")));
        }
        self.inner.load_chain(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_fails_everything() {
        let backend = FailingChainBackend::unavailable();
        assert!(backend.load_chain("n1").is_err());
        assert!(backend.save_chain(&Chain::new(), "n1").is_err());
    }

    #[test]
    fn test_failing_saves_can_recover() {
        let backend = FailingChainBackend::failing_saves(InMemoryChainBackend::new());
        assert!(backend.load_chain("n1").unwrap().is_empty());
        assert!(backend.save_chain(&Chain::new(), "n1").is_err());

        backend.set_fail_saves(false);
        backend.save_chain(&Chain::new(), "n1").unwrap();
        assert_eq!(backend.inner().save_count("n1"), 1);
    }
}
