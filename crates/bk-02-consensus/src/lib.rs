//! # bk-02-consensus
//!
//! The chain acceptance rule and the vote tally used by chain gossip.
//!
//! ## Rule
//!
//! A node adopts an offered chain only when it is strictly longer than its
//! own. Equal-length chains are rejected whatever their content; there is no
//! tie-break by hash, timestamp or work.
//!
//! ## Tally
//!
//! The broadcasting node folds every peer response into a [`VoteTally`].
//! Peers that could not be reached (or failed to answer) are counted apart and
//! excluded from the denominator. The broadcast chain is repudiated when
//!
//! ```text
//! rejected / (accepted + rejected) > rejection_threshold
//! ```
//!
//! A round with no votes at all never repudiates.

pub mod domain;

pub use domain::{
    longest_chain_rule, ConsensusConfig, ConsensusError, PeerResponse, Vote, VoteTally,
    DEFAULT_REJECTION_THRESHOLD,
};
