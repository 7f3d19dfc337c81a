//! # bk-03-node
//!
//! The node actor: owns one node's pending pool and peer set, reads its chain
//! through a [`ChainBackend`](bk_01_chain_storage::ChainBackend), and talks to
//! other nodes only through [`PeerGateway`] handles.
//!
//! ## Message Surface
//!
//! | Call | Effect |
//! |------|--------|
//! | `register_peer` | Append a peer to the fan-out set |
//! | `register_transaction` | Dedup, pool, mine when full, gossip |
//! | `receive_chain` | Longest-chain vote; adopt when strictly longer |
//! | `share_chain` | Offer the chain to every peer, tally, roll back if repudiated |
//! | `chain` / `pending_transactions` / `peer_proxies` / `should_mine` | Queries |
//!
//! ## Intake Turn
//!
//! ```text
//! register_transaction(t)
//!   ├─ t pending?            → Duplicate
//!   ├─ t in a chain block?   → AlreadyIncluded
//!   ├─ pool t
//!   ├─ pool ≥ block_size?    → mine, persist, offer chain to peers
//!   └─ gossip t to peers     → Added
//! ```
//!
//! Both duplicate checks make intake idempotent, which is what terminates
//! gossip on cyclic peer graphs.
//!
//! ## Unreachable Peers
//!
//! A peer whose mailbox is closed or stays full past `peer_timeout`, or whose
//! vote does not arrive in time, is skipped for that fan-out and counted as
//! unreachable. Unreachable peers are excluded from the tally denominator.

pub mod actor;
pub mod domain;
pub mod peers;
pub mod ports;
mod service;

pub use actor::{NodeActor, NodeHandle};
pub use domain::{NodeConfig, NodeError, Registration, ShareOutcome};
pub use ports::{Clock, PeerGateway, SystemClock, VoteReceiver};
