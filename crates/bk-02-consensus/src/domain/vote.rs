//! Votes and the longest-chain rule.

use serde::{Deserialize, Serialize};
use shared_types::Chain;
use std::fmt;

/// A peer's answer to an offered chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Vote {
    /// The peer adopted the offered chain.
    Accepted,
    /// The peer kept its own chain.
    Rejected,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Accepted => write!(f, "ACCEPTED"),
            Vote::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Longest chain wins: `Accepted` iff `incoming` is strictly longer.
pub fn longest_chain_rule(local: &Chain, incoming: &Chain) -> Vote {
    if incoming.len() > local.len() {
        Vote::Accepted
    } else {
        Vote::Rejected
    }
}
