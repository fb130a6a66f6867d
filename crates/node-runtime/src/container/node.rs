//! # Node Record
//!
//! One running instance of the storage peer and every subsystem handle it owns.
//!
//! ## Field States
//!
//! Every owned field is an `Option` from the moment the record is allocated,
//! so the dismantler's presence checks are well defined at any point of a
//! partial construction. Fields only move from absent to present while the
//! composer runs.
//!
//! The identity is not a field: it is borrowed from the repository config and
//! disappears with it.
//!
//! Mode and routing share one field, [`Network`]. Only the `Online` variant
//! has a routing slot, so an `Offline` node holding a routing handle cannot
//! be built.
//!
//! Store accessors hand out borrows, never the `Arc`s, so nothing outside the
//! node keeps a store alive past `destroy`.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shared_types::{Identity, Mode, PeerId};

use crate::ports::outbound::{
    BlockExchange, BlockStore, NodeView, PeerStore, ProviderStore, Repository, Routing,
};

/// Subsystems owned by a node, in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemId {
    Repo,
    Peerstore,
    Providerstore,
    Blockstore,
    Routing,
    Exchange,
}

impl SubsystemId {
    /// Get the subsystem name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Peerstore => "peerstore",
            Self::Providerstore => "providerstore",
            Self::Blockstore => "blockstore",
            Self::Routing => "routing",
            Self::Exchange => "exchange",
        }
    }

    /// Get all subsystem IDs in construction order.
    #[must_use]
    pub fn all() -> [SubsystemId; 6] {
        [
            Self::Repo,
            Self::Peerstore,
            Self::Providerstore,
            Self::Blockstore,
            Self::Routing,
            Self::Exchange,
        ]
    }
}

/// Network activation state.
pub(crate) enum Network {
    Offline,
    /// Routing was activated. The slot is emptied when teardown releases it;
    /// the node stays `Online`.
    Online(Option<Box<dyn Routing>>),
}

impl Network {
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Self::Offline => Mode::Offline,
            Self::Online(_) => Mode::Online,
        }
    }
}

/// A running (or partially built) node.
///
/// Obtained from [`crate::construct`]; dropping it, or passing it to
/// [`crate::destroy`], releases every subsystem in teardown order.
pub struct Node {
    pub(crate) instance_id: Uuid,
    pub(crate) network: Network,
    pub(crate) repo: Option<Box<dyn Repository>>,
    pub(crate) peerstore: Option<Arc<dyn PeerStore>>,
    pub(crate) providerstore: Option<Arc<dyn ProviderStore>>,
    pub(crate) blockstore: Option<Arc<dyn BlockStore>>,
    pub(crate) exchange: Option<Box<dyn BlockExchange>>,
}

impl Node {
    /// Allocate a record with every field absent.
    pub(crate) fn empty() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            network: Network::Offline,
            repo: None,
            peerstore: None,
            providerstore: None,
            blockstore: None,
            exchange: None,
        }
    }

    /// Store an activated routing handle. The node becomes `Online` in the
    /// same step.
    pub(crate) fn activate_routing(&mut self, routing: Box<dyn Routing>) {
        self.network = Network::Online(Some(routing));
    }

    /// View handed to routing and exchange. `None` until identity and all
    /// three stores are present.
    pub(crate) fn view(&self) -> Option<NodeView<'_>> {
        Some(NodeView {
            identity: self.identity()?,
            mode: self.mode(),
            peerstore: self.peerstore.as_ref()?,
            providerstore: self.providerstore.as_ref()?,
            blockstore: self.blockstore.as_ref()?,
        })
    }

    /// Per-instance id used to correlate log lines.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn mode(&self) -> Mode {
        self.network.mode()
    }

    /// Identity borrowed from the opened repository.
    pub fn identity(&self) -> Option<&Identity> {
        self.repo.as_deref().and_then(|repo| repo.identity())
    }

    pub fn peer_id(&self) -> Option<PeerId> {
        self.identity().map(|identity| identity.peer_id)
    }

    pub fn repo(&self) -> Option<&dyn Repository> {
        self.repo.as_deref()
    }

    pub fn peerstore(&self) -> Option<&dyn PeerStore> {
        self.peerstore.as_deref()
    }

    pub fn providerstore(&self) -> Option<&dyn ProviderStore> {
        self.providerstore.as_deref()
    }

    pub fn blockstore(&self) -> Option<&dyn BlockStore> {
        self.blockstore.as_deref()
    }

    /// Routing handle; present only when the node is `Online`.
    pub fn routing(&self) -> Option<&dyn Routing> {
        match &self.network {
            Network::Online(routing) => routing.as_deref(),
            Network::Offline => None,
        }
    }

    /// Block-exchange session.
    pub fn exchange(&self) -> Option<&dyn BlockExchange> {
        self.exchange.as_deref()
    }

    pub fn has_exchange(&self) -> bool {
        self.exchange.is_some()
    }

    /// Whether `id` is currently held by this node.
    pub fn is_present(&self, id: SubsystemId) -> bool {
        match id {
            SubsystemId::Repo => self.repo.is_some(),
            SubsystemId::Peerstore => self.peerstore.is_some(),
            SubsystemId::Providerstore => self.providerstore.is_some(),
            SubsystemId::Blockstore => self.blockstore.is_some(),
            SubsystemId::Routing => self.routing().is_some(),
            SubsystemId::Exchange => self.exchange.is_some(),
        }
    }

    /// Every subsystem the current mode requires is present.
    pub fn is_complete(&self) -> bool {
        SubsystemId::all().into_iter().all(|id| match id {
            SubsystemId::Routing => self.is_present(id) == self.mode().is_online(),
            _ => self.is_present(id),
        })
    }

    /// Print node status.
    pub fn print_status(&self) {
        info!("===========================================");
        info!("  NODE STATUS ({})", self.instance_id);
        info!("===========================================");
        if let Some(peer_id) = self.peer_id() {
            info!("  peer id: {}", peer_id);
        }
        info!("  mode:    {}", self.mode());

        for id in SubsystemId::all() {
            let state = if self.is_present(id) {
                "present"
            } else {
                "absent"
            };
            info!("  {:15} {}", id.name(), state);
        }

        info!("===========================================");
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("instance_id", &self.instance_id)
            .field("mode", &self.mode())
            .field("peer_id", &self.peer_id())
            .field("repo", &self.repo.is_some())
            .field("peerstore", &self.peerstore.is_some())
            .field("providerstore", &self.providerstore.is_some())
            .field("blockstore", &self.blockstore.is_some())
            .field("routing", &self.routing().is_some())
            .field("exchange", &self.exchange.is_some())
            .finish()
    }
}
