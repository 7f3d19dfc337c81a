//! Vote tallying for chain gossip rounds.

use super::config::ConsensusConfig;
use super::vote::Vote;

/// What came back from one peer during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerResponse {
    Voted(Vote),
    /// Unreachable, timed out, or answered with an error.
    Unreachable,
}

/// Counts for one chain gossip round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub accepted: usize,
    pub rejected: usize,
    /// Peers excluded from the denominator.
    pub unreachable: usize,
}

impl VoteTally {
    pub fn record(mut self, response: PeerResponse) -> Self {
        match response {
            PeerResponse::Voted(Vote::Accepted) => self.accepted += 1,
            PeerResponse::Voted(Vote::Rejected) => self.rejected += 1,
            PeerResponse::Unreachable => self.unreachable += 1,
        }
        self
    }

    /// Number of votes actually cast.
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }

    /// `rejected / total`, `None` when nobody voted.
    pub fn rejection_fraction(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.rejected as f64 / total as f64),
        }
    }

    pub fn is_repudiated(&self, config: &ConsensusConfig) -> bool {
        self.rejection_fraction()
            .is_some_and(|fraction| fraction > config.rejection_threshold)
    }
}

impl FromIterator<PeerResponse> for VoteTally {
    fn from_iter<I: IntoIterator<Item = PeerResponse>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::record)
    }
}
