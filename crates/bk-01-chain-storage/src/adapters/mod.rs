//! Storage Adapters
//!
//! Implementations of the `ChainBackend` trait.

mod file;
mod memory;

pub use file::FileChainBackend;
pub use memory::InMemoryChainBackend;
