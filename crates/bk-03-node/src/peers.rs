//! Registered peers, in registration order.

use crate::ports::PeerGateway;
use std::sync::Arc;

/// Peers grow only by registration. Registering the same peer twice keeps
/// both entries, so it receives every fan-out twice.
#[derive(Default, Clone)]
pub struct PeerSet {
    peers: Vec<Arc<dyn PeerGateway>>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, peer: Arc<dyn PeerGateway>) {
        self.peers.push(peer);
    }

    pub fn ids(&self) -> Vec<String> {
        self.peers.iter().map(|p| p.peer_id().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PeerGateway>> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
