//! Domain layer for chain consensus.

mod config;
mod tally;
mod vote;

pub use config::*;
pub use tally::*;
pub use vote::*;
