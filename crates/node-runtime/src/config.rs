//! # Runtime Configuration
//!
//! Defaults with environment overrides. A value that does not parse, or is
//! out of range, is logged and the default kept.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `BK_NODE_IDS` | comma-separated node ids | `node-a,node-b` |
//! | `BK_DATA_DIR` | chain storage directory | `./tmp` |
//! | `BK_BLOCK_SIZE` | transactions per block | `5` |
//! | `BK_PEER_TIMEOUT_MS` | peer enqueue / vote timeout | `5000` |
//! | `BK_REJECTION_THRESHOLD` | repudiation fraction | `0.5` |

use bk_01_chain_storage::StorageConfig;
use bk_03_node::{NodeConfig, NodeError};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_NODE_IDS: &str = "BK_NODE_IDS";
pub const ENV_DATA_DIR: &str = "BK_DATA_DIR";
pub const ENV_BLOCK_SIZE: &str = "BK_BLOCK_SIZE";
pub const ENV_PEER_TIMEOUT_MS: &str = "BK_PEER_TIMEOUT_MS";
pub const ENV_REJECTION_THRESHOLD: &str = "BK_REJECTION_THRESHOLD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("At least one node id is required")]
    NoNodes,

    #[error("Node id {0:?} is configured twice")]
    DuplicateNodeId(String),

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub node_ids: Vec<String>,
    pub storage: StorageConfig,
    /// Shared by every node.
    pub node: NodeConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            node_ids: vec!["node-a".to_string(), "node-b".to_string()],
            storage: StorageConfig::default(),
            node: NodeConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Apply overrides read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ids) = lookup(ENV_NODE_IDS) {
            let ids: Vec<String> = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            if ids.is_empty() {
                warn!("{ENV_NODE_IDS} lists no node ids, keeping defaults");
            } else {
                config.node_ids = ids;
            }
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.storage.data_dir = dir.into();
        }

        if let Some(value) = lookup(ENV_BLOCK_SIZE) {
            match value.parse::<usize>() {
                Ok(size) if size > 0 => config.node.block_size = size,
                _ => warn!("{ENV_BLOCK_SIZE} must be a positive integer, got {value:?}"),
            }
        }

        if let Some(value) = lookup(ENV_PEER_TIMEOUT_MS) {
            match value.parse::<u64>() {
                Ok(ms) if ms > 0 => config.node.peer_timeout = Duration::from_millis(ms),
                _ => warn!("{ENV_PEER_TIMEOUT_MS} must be a positive integer, got {value:?}"),
            }
        }

        if let Some(value) = lookup(ENV_REJECTION_THRESHOLD) {
            match value.parse::<f64>() {
                Ok(t) if (0.0..1.0).contains(&t) => config.node.consensus.rejection_threshold = t,
                _ => warn!("{ENV_REJECTION_THRESHOLD} must lie in [0, 1), got {value:?}"),
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_ids.is_empty() {
            return Err(ConfigError::NoNodes);
        }
        let mut seen = HashSet::new();
        for id in &self.node_ids {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateNodeId(id.clone()));
            }
        }
        self.node.validate()?;
        Ok(())
    }
}

/// Load configuration from the environment.
pub fn load_config() -> RuntimeConfig {
    let config = RuntimeConfig::from_lookup(|key| std::env::var(key).ok());
    info!(
        nodes = ?config.node_ids,
        data_dir = %config.storage.data_dir.display(),
        block_size = config.node.block_size,
        "Loaded runtime configuration"
    );
    config
}
