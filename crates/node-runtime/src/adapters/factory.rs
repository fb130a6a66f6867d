//! Production collaborators: filesystem repository and block store, in-memory
//! peer and provider tables, local routing and the want-list exchange.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use shared_types::{PeerId, PrivateKey};

use crate::adapters::{
    Bitswap, FsBlockStore, FsRepo, MemoryPeerStore, MemoryProviderStore, OnlineRouting,
};
use crate::ports::errors::{BlockStoreError, ExchangeError, RepoError, RoutingError, StoreError};
use crate::ports::outbound::{
    BlockExchange, BlockStore, NodeView, PeerStore, ProviderStore, Repository, Routing,
    SubsystemFactory,
};

/// Default wait for the repository lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory wiring the default adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultSubsystems {
    lock_timeout: Duration,
}

impl DefaultSubsystems {
    pub fn new(lock_timeout: Duration) -> Self {
        Self { lock_timeout }
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }
}

impl Default for DefaultSubsystems {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl SubsystemFactory for DefaultSubsystems {
    fn repository(&self, path: &Path) -> Result<Box<dyn Repository>, RepoError> {
        Ok(Box::new(FsRepo::new(path, self.lock_timeout)?))
    }

    fn peerstore(&self, local: &PeerId) -> Result<Arc<dyn PeerStore>, StoreError> {
        Ok(Arc::new(MemoryPeerStore::new(*local)))
    }

    fn providerstore(&self) -> Result<Arc<dyn ProviderStore>, StoreError> {
        Ok(Arc::new(MemoryProviderStore::new()))
    }

    fn blockstore(&self, repo: &dyn Repository) -> Result<Arc<dyn BlockStore>, BlockStoreError> {
        Ok(Arc::new(FsBlockStore::new(repo.blocks_dir())?))
    }

    fn routing(
        &self,
        node: &NodeView<'_>,
        private_key: &PrivateKey,
    ) -> Result<Box<dyn Routing>, RoutingError> {
        Ok(Box::new(OnlineRouting::activate(node, private_key)?))
    }

    fn exchange(&self, node: &NodeView<'_>) -> Result<Box<dyn BlockExchange>, ExchangeError> {
        Ok(Box::new(Bitswap::start(node)))
    }
}
