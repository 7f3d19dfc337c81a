//! Storage domain types.

mod config;
mod errors;

pub use config::StorageConfig;
pub use errors::StorageError;
