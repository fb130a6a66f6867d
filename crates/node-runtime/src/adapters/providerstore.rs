//! In-memory provider records.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use shared_types::{Cid, PeerId};

use crate::ports::outbound::ProviderStore;

/// Provider table: content id → peers that announced it, in announcement order.
#[derive(Default)]
pub struct MemoryProviderStore {
    records: RwLock<HashMap<Cid, Vec<PeerId>>>,
}

impl MemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProviderStore for MemoryProviderStore {
    fn add_provider(&self, cid: Cid, peer: PeerId) {
        let mut records = self.records.write();
        let providers = records.entry(cid).or_default();
        if !providers.contains(&peer) {
            providers.push(peer);
        }
    }

    fn providers(&self, cid: &Cid) -> Vec<PeerId> {
        self.records.read().get(cid).cloned().unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}

impl Drop for MemoryProviderStore {
    fn drop(&mut self) {
        debug!(records = self.records.get_mut().len(), "providerstore dropped");
    }
}
