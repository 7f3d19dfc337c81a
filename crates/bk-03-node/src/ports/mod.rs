//! Ports of the node actor.

pub mod outbound;

pub use outbound::{Clock, PeerGateway, SystemClock, VoteReceiver};
