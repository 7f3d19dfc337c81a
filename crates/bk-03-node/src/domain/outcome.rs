//! Results of node operations.

use bk_02_consensus::VoteTally;

/// How transaction intake treated a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New: pooled and gossiped.
    Added,
    /// Already pending. Nothing happened.
    Duplicate,
    /// Already recorded in a block of the current chain. Nothing happened.
    AlreadyIncluded,
}

/// Result of a chain gossip round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareOutcome {
    pub tally: VoteTally,
    /// Whether the offered tip was repudiated and removed.
    pub rolled_back: bool,
}
