//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the node composer.
//!
//! Every collaborator is a trait object so that alternate implementations
//! (and recording test doubles) can be substituted through a
//! [`SubsystemFactory`]. Releasing a collaborator means dropping the handle
//! the node holds; the exchange session additionally exposes an explicit
//! [`Exchange::close`].
//!
//! Production: `DefaultSubsystems` (adapters/factory.rs)

use std::path::Path;
use std::sync::Arc;

use shared_types::{Block, Cid, Identity, Mode, PeerId, PrivateKey};

use crate::ports::errors::{BlockStoreError, ExchangeError, RepoError, RoutingError, StoreError};

/// A persistent repository holding configuration, identity and block data.
pub trait Repository: Send + Sync {
    /// Open the repository. Must leave no visible side effects on failure.
    fn open(&mut self) -> Result<(), RepoError>;

    fn is_open(&self) -> bool;

    fn root(&self) -> &Path;

    /// Directory the block store is built over.
    fn blocks_dir(&self) -> &Path;

    /// Identity from the repository config. `None` until opened.
    fn identity(&self) -> Option<&Identity>;
}

/// Address book of known peers.
pub trait PeerStore: Send + Sync {
    /// The peer the store was seeded with.
    fn local_peer(&self) -> PeerId;

    /// Add a peer, merging addresses if it is already known.
    fn add_peer(&self, peer: PeerId, addrs: Vec<String>);

    fn addresses(&self, peer: &PeerId) -> Option<Vec<String>>;

    fn contains(&self, peer: &PeerId) -> bool {
        self.addresses(peer).is_some()
    }

    fn peers(&self) -> Vec<PeerId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Table of which peers provide which content.
pub trait ProviderStore: Send + Sync {
    fn add_provider(&self, cid: Cid, peer: PeerId);

    fn providers(&self, cid: &Cid) -> Vec<PeerId>;

    /// Number of distinct content ids with at least one provider.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Content-addressed block storage.
pub trait BlockStore: Send + Sync {
    fn put(&self, block: &Block) -> Result<(), BlockStoreError>;

    fn get(&self, cid: &Cid) -> Result<Option<Block>, BlockStoreError>;

    fn has(&self, cid: &Cid) -> Result<bool, BlockStoreError>;

    fn delete(&self, cid: &Cid) -> Result<(), BlockStoreError>;
}

/// Network routing: locating peers and content providers.
pub trait Routing: Send + Sync {
    fn local_peer(&self) -> PeerId;

    /// Announce the local peer as a provider of `cid`.
    fn provide(&self, cid: &Cid) -> Result<(), RoutingError>;

    fn find_providers(&self, cid: &Cid) -> Vec<PeerId>;

    fn find_peer(&self, peer: &PeerId) -> Option<Vec<String>>;
}

/// Block-exchange session.
///
/// Teardown only needs to shut the session down; which protocol is running
/// behind it is the implementation's business.
pub trait Exchange: Send + Sync {
    /// Shut the session down. Called exactly once by the dismantler.
    fn close(&mut self);
}

/// Block-level operations of an exchange session, reachable through
/// `Node::exchange`.
pub trait BlockExchange: Exchange {
    /// Serve `cid` from the local store, or record a want and report
    /// `ExchangeError::NotFound`.
    fn get_block(&self, cid: &Cid) -> Result<Block, ExchangeError>;

    /// Accept a block, satisfying any outstanding want for it.
    fn has_block(&self, block: &Block) -> Result<(), ExchangeError>;

    /// Outstanding wants, in CID order.
    fn wantlist(&self) -> Vec<Cid>;
}

/// Read-only view of a node under construction, handed to the subsystems that
/// need the rest of the node (routing and exchange).
///
/// The node stays the only strong owner of its stores; routing and exchange
/// keep `Weak` handles so each store is freed at its own teardown step.
pub struct NodeView<'a> {
    pub identity: &'a Identity,
    pub mode: Mode,
    pub peerstore: &'a Arc<dyn PeerStore>,
    pub providerstore: &'a Arc<dyn ProviderStore>,
    pub blockstore: &'a Arc<dyn BlockStore>,
}

impl NodeView<'_> {
    pub fn peer_id(&self) -> PeerId {
        self.identity.peer_id
    }
}

/// Constructors for every collaborator, in the order the composer calls them.
pub trait SubsystemFactory {
    /// Build an (unopened) repository handle for `path`.
    fn repository(&self, path: &Path) -> Result<Box<dyn Repository>, RepoError>;

    /// Build a peerstore seeded with `local`.
    fn peerstore(&self, local: &PeerId) -> Result<Arc<dyn PeerStore>, StoreError>;

    fn providerstore(&self) -> Result<Arc<dyn ProviderStore>, StoreError>;

    /// Build a block store over an opened repository.
    fn blockstore(&self, repo: &dyn Repository) -> Result<Arc<dyn BlockStore>, BlockStoreError>;

    /// Activate online routing for `node`, signing with `private_key`.
    fn routing(
        &self,
        node: &NodeView<'_>,
        private_key: &PrivateKey,
    ) -> Result<Box<dyn Routing>, RoutingError>;

    /// Start the block-exchange session for a wired node.
    fn exchange(&self, node: &NodeView<'_>) -> Result<Box<dyn BlockExchange>, ExchangeError>;
}
