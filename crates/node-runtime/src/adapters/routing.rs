//! # Online Routing
//!
//! Local routing table over the node's peer and provider stores.
//! Provider announcements are signed with the node's private key so that
//! records can be checked against the announcing peer.
//!
//! The stores are held through `Weak` handles; the node owns them. After the
//! node releases a store, lookups come back empty and `provide` reports
//! `Unavailable`.

use std::sync::{Arc, Weak};

use tracing::{debug, info};

use shared_types::{Cid, PeerId, PrivateKey};

use crate::ports::errors::RoutingError;
use crate::ports::outbound::{NodeView, PeerStore, ProviderStore, Routing};

/// Routing handle held by an online node.
pub struct OnlineRouting {
    local: PeerId,
    key: PrivateKey,
    peerstore: Weak<dyn PeerStore>,
    providerstore: Weak<dyn ProviderStore>,
}

impl OnlineRouting {
    /// Activate routing for `node`.
    ///
    /// # Errors
    ///
    /// `RoutingError::KeyMismatch` if `private_key` does not belong to the
    /// node's peer id.
    pub fn activate(node: &NodeView<'_>, private_key: &PrivateKey) -> Result<Self, RoutingError> {
        let local = node.peer_id();
        let derived = PeerId::from_public_key(&private_key.public_key());
        if derived != local {
            debug!(key_owner = %derived.short(), "routing key rejected");
            return Err(RoutingError::KeyMismatch(local.short()));
        }

        info!(peer = %local.short(), "routing activated");
        Ok(Self {
            local,
            key: private_key.clone(),
            peerstore: Arc::downgrade(node.peerstore),
            providerstore: Arc::downgrade(node.providerstore),
        })
    }

    /// Sign a provider record for `cid`.
    pub fn sign_record(&self, cid: &Cid) -> [u8; 64] {
        self.key.sign(&record_bytes(&self.local, cid))
    }

    /// Check a provider record signed by [`Self::sign_record`].
    pub fn verify_record(&self, cid: &Cid, signature: &[u8; 64]) -> bool {
        self.key.verify(&record_bytes(&self.local, cid), signature)
    }
}

fn record_bytes(peer: &PeerId, cid: &Cid) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(peer.as_bytes());
    bytes.extend_from_slice(cid.as_bytes());
    bytes
}

impl Routing for OnlineRouting {
    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn provide(&self, cid: &Cid) -> Result<(), RoutingError> {
        let providers = self
            .providerstore
            .upgrade()
            .ok_or_else(|| RoutingError::Unavailable("providerstore released".into()))?;
        providers.add_provider(*cid, self.local);
        debug!(%cid, "announced as provider");
        Ok(())
    }

    fn find_providers(&self, cid: &Cid) -> Vec<PeerId> {
        self.providerstore
            .upgrade()
            .map(|providers| providers.providers(cid))
            .unwrap_or_default()
    }

    fn find_peer(&self, peer: &PeerId) -> Option<Vec<String>> {
        self.peerstore.upgrade()?.addresses(peer)
    }
}

impl Drop for OnlineRouting {
    fn drop(&mut self) {
        info!(peer = %self.local.short(), "routing deactivated");
    }
}
