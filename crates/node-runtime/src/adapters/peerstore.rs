//! In-memory peer address book.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use shared_types::PeerId;

use crate::ports::outbound::PeerStore;

/// Peerstore backed by a `RwLock<HashMap>`, seeded with the local peer.
pub struct MemoryPeerStore {
    local: PeerId,
    peers: RwLock<HashMap<PeerId, Vec<String>>>,
}

impl MemoryPeerStore {
    pub fn new(local: PeerId) -> Self {
        let mut peers = HashMap::new();
        peers.insert(local, Vec::new());
        Self {
            local,
            peers: RwLock::new(peers),
        }
    }
}

impl PeerStore for MemoryPeerStore {
    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn add_peer(&self, peer: PeerId, addrs: Vec<String>) {
        let mut peers = self.peers.write();
        let known = peers.entry(peer).or_default();
        for addr in addrs {
            if !known.contains(&addr) {
                known.push(addr);
            }
        }
    }

    fn addresses(&self, peer: &PeerId) -> Option<Vec<String>> {
        self.peers.read().get(peer).cloned()
    }

    fn peers(&self) -> Vec<PeerId> {
        self.peers.read().keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.peers.read().len()
    }
}

impl Drop for MemoryPeerStore {
    fn drop(&mut self) {
        debug!(peers = self.peers.get_mut().len(), "peerstore dropped");
    }
}
