//! # Chain Storage (bk-01)
//!
//! Durable storage of one chain document per node identity.
//!
//! ## Port
//!
//! The node core depends only on [`ChainBackend`]:
//!
//! | Operation | Contract |
//! |-----------|----------|
//! | `save_chain(chain, node_id)` | Fully overwrites the stored chain |
//! | `load_chain(node_id)` | Latest saved chain; unknown ids load as the empty chain |
//!
//! Backends are shared behind `Arc` and take `&self`. Concurrent writers for
//! the same node id are not supported; each node actor is the only writer of
//! its own record.
//!
//! ## Adapters
//!
//! - [`FileChainBackend`]: `<data_dir>/<node_id>.json`, atomic temp-file writes
//! - [`InMemoryChainBackend`]: canonical documents held in a map (tests, demos)
//!
//! ## Document Format
//!
//! ```text
//! {"blocks": [{"timestamp": "2017-01-02T03:04:05.000123Z",
//!              "prev_hash": "..." | null,
//!              "hash": "...",
//!              "data": <any JSON>}, ...]}
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{FileChainBackend, InMemoryChainBackend};
pub use domain::{StorageConfig, StorageError};
pub use ports::ChainBackend;
