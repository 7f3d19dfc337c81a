//! Node domain: configuration, errors, the pending pool and the block data
//! codec. Nothing here touches channels or peers.

pub mod batch;
pub mod config;
pub mod errors;
pub mod outcome;
pub mod pool;

pub use config::{NodeConfig, DEFAULT_BLOCK_SIZE, DEFAULT_MAILBOX_CAPACITY, DEFAULT_PEER_TIMEOUT};
pub use errors::NodeError;
pub use outcome::{Registration, ShareOutcome};
pub use pool::PendingPool;
