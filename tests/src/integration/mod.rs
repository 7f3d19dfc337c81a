//! Integration flows.

#[cfg(test)]
pub(crate) mod fixtures;

pub mod e2e;
pub mod gossip;
pub mod persistence;
