//! # Shared Types Crate
//!
//! Ledger entities shared by every Blokka crate.
//!
//! ## Design Principles
//!
//! - **Immutable by construction**: a `Block` hash is computed once from its
//!   inputs and fields are only reachable through getters.
//! - **Value semantics**: entities are plain owned values. A chain handed to a
//!   peer is a copy; nothing aliases another node's state.
//! - **Canonical form**: every entity implements [`Canonical`], the structured
//!   JSON form used both for persistence and for content hashing.
//!
//! ## Entities
//!
//! - [`Transaction`]: seller, buyer, timestamp, amount. Identity is its hash.
//! - [`Block`]: timestamp, optional `prev_hash`, opaque structured `data`.
//! - [`Chain`]: genesis-first sequence of blocks linked by `prev_hash`.

pub mod canonical;
pub mod entities;
pub mod errors;
pub mod timestamp;

pub use canonical::Canonical;
pub use entities::{Block, Chain, Transaction};
pub use errors::{ChainError, SerializationError};
pub use timestamp::{Timestamp, TIMESTAMP_FORMAT};

/// Lowercase hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}
