//! # Recording Test Doubles
//!
//! A [`SubsystemFactory`] whose collaborators write every acquisition and
//! release into a shared journal, with optional failure injection at any
//! construction step.
//!
//! Releases are recorded from `Drop`, so the journal shows exactly when the
//! node let go of each handle.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use node_runtime::container::SubsystemId;
use node_runtime::ports::errors::{
    BlockStoreError, ExchangeError, RepoError, RoutingError, StoreError,
};
use node_runtime::ports::outbound::{
    BlockExchange, BlockStore, Exchange, NodeView, PeerStore, ProviderStore, Repository, Routing,
    SubsystemFactory,
};
use shared_types::{Block, Cid, Identity, Mode, PeerId, PrivateKey};

/// One lifecycle event of a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Acquired(SubsystemId),
    Released(SubsystemId),
    /// The exchange session was shut down (before its release).
    ExchangeClosed,
}

/// Construction step at which the factory reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    CreateRepo,
    OpenRepo,
    Peerstore,
    Providerstore,
    Blockstore,
    Routing,
    Exchange,
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

/// What the routing and exchange constructors were handed.
#[derive(Debug, Default)]
pub struct Observations {
    /// Owner of the key given to routing.
    pub routing_key_owner: Option<PeerId>,
    /// Node mode seen by the exchange constructor.
    pub exchange_mode: Option<Mode>,
}

/// Factory of recording doubles.
pub struct RecordingFactory {
    identity: Identity,
    fail_at: Option<FailAt>,
    journal: Journal,
    observations: Arc<Mutex<Observations>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            identity: Identity::generate(),
            fail_at: None,
            journal: Arc::new(Mutex::new(Vec::new())),
            observations: Arc::new(Mutex::new(Observations::default())),
        }
    }

    pub fn failing_at(step: FailAt) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Snapshot of the journal.
    pub fn events(&self) -> Vec<Event> {
        self.journal.lock().clone()
    }

    /// Released subsystems, in release order.
    pub fn releases(&self) -> Vec<SubsystemId> {
        self.journal
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Released(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Acquired subsystems, in acquisition order.
    pub fn acquisitions(&self) -> Vec<SubsystemId> {
        self.journal
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Acquired(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn observed_exchange_mode(&self) -> Option<Mode> {
        self.observations.lock().exchange_mode
    }

    pub fn observed_routing_key_owner(&self) -> Option<PeerId> {
        self.observations.lock().routing_key_owner
    }

    fn fails(&self, step: FailAt) -> bool {
        self.fail_at == Some(step)
    }

    fn acquire(&self, id: SubsystemId) -> Recorder {
        self.journal.lock().push(Event::Acquired(id));
        Recorder {
            id,
            journal: Arc::clone(&self.journal),
        }
    }
}

impl Default for RecordingFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `Released(id)` when dropped.
struct Recorder {
    id: SubsystemId,
    journal: Journal,
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.journal.lock().push(Event::Released(self.id));
    }
}

// =============================================================================
// DOUBLES
// =============================================================================

struct FakeRepo {
    root: PathBuf,
    blocks_dir: PathBuf,
    identity: Identity,
    fail_open: bool,
    journal: Journal,
    // Present only once opened; an unopened handle has nothing to release.
    recorder: Option<Recorder>,
}

impl Repository for FakeRepo {
    fn open(&mut self) -> Result<(), RepoError> {
        if self.fail_open {
            return Err(RepoError::NotInitialized(self.root.clone()));
        }
        self.journal.lock().push(Event::Acquired(SubsystemId::Repo));
        self.recorder = Some(Recorder {
            id: SubsystemId::Repo,
            journal: Arc::clone(&self.journal),
        });
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.recorder.is_some()
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn blocks_dir(&self) -> &Path {
        &self.blocks_dir
    }

    fn identity(&self) -> Option<&Identity> {
        self.recorder.as_ref().map(|_| &self.identity)
    }
}

struct FakePeerStore {
    local: PeerId,
    _recorder: Recorder,
}

impl PeerStore for FakePeerStore {
    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn add_peer(&self, _peer: PeerId, _addrs: Vec<String>) {}

    fn addresses(&self, peer: &PeerId) -> Option<Vec<String>> {
        (*peer == self.local).then(Vec::new)
    }

    fn peers(&self) -> Vec<PeerId> {
        vec![self.local]
    }

    fn len(&self) -> usize {
        1
    }
}

struct FakeProviderStore {
    _recorder: Recorder,
}

impl ProviderStore for FakeProviderStore {
    fn add_provider(&self, _cid: Cid, _peer: PeerId) {}

    fn providers(&self, _cid: &Cid) -> Vec<PeerId> {
        Vec::new()
    }

    fn len(&self) -> usize {
        0
    }
}

struct FakeBlockStore {
    _recorder: Recorder,
}

impl BlockStore for FakeBlockStore {
    fn put(&self, _block: &Block) -> Result<(), BlockStoreError> {
        Ok(())
    }

    fn get(&self, _cid: &Cid) -> Result<Option<Block>, BlockStoreError> {
        Ok(None)
    }

    fn has(&self, _cid: &Cid) -> Result<bool, BlockStoreError> {
        Ok(false)
    }

    fn delete(&self, _cid: &Cid) -> Result<(), BlockStoreError> {
        Ok(())
    }
}

struct FakeRouting {
    local: PeerId,
    _recorder: Recorder,
}

impl Routing for FakeRouting {
    fn local_peer(&self) -> PeerId {
        self.local
    }

    fn provide(&self, _cid: &Cid) -> Result<(), RoutingError> {
        Ok(())
    }

    fn find_providers(&self, _cid: &Cid) -> Vec<PeerId> {
        Vec::new()
    }

    fn find_peer(&self, _peer: &PeerId) -> Option<Vec<String>> {
        None
    }
}

struct FakeExchange {
    journal: Journal,
    _recorder: Recorder,
}

impl Exchange for FakeExchange {
    fn close(&mut self) {
        self.journal.lock().push(Event::ExchangeClosed);
    }
}

impl BlockExchange for FakeExchange {
    fn get_block(&self, cid: &Cid) -> Result<Block, ExchangeError> {
        Err(ExchangeError::NotFound(*cid))
    }

    fn has_block(&self, _block: &Block) -> Result<(), ExchangeError> {
        Ok(())
    }

    fn wantlist(&self) -> Vec<Cid> {
        Vec::new()
    }
}

// =============================================================================
// FACTORY
// =============================================================================

impl SubsystemFactory for RecordingFactory {
    fn repository(&self, path: &Path) -> Result<Box<dyn Repository>, RepoError> {
        if self.fails(FailAt::CreateRepo) {
            return Err(RepoError::InvalidPath(path.display().to_string()));
        }
        Ok(Box::new(FakeRepo {
            root: path.to_path_buf(),
            blocks_dir: path.join("blocks"),
            identity: self.identity.clone(),
            fail_open: self.fails(FailAt::OpenRepo),
            journal: Arc::clone(&self.journal),
            recorder: None,
        }))
    }

    fn peerstore(&self, local: &PeerId) -> Result<Arc<dyn PeerStore>, StoreError> {
        if self.fails(FailAt::Peerstore) {
            return Err(StoreError::Unavailable("injected".into()));
        }
        Ok(Arc::new(FakePeerStore {
            local: *local,
            _recorder: self.acquire(SubsystemId::Peerstore),
        }))
    }

    fn providerstore(&self) -> Result<Arc<dyn ProviderStore>, StoreError> {
        if self.fails(FailAt::Providerstore) {
            return Err(StoreError::Unavailable("injected".into()));
        }
        Ok(Arc::new(FakeProviderStore {
            _recorder: self.acquire(SubsystemId::Providerstore),
        }))
    }

    fn blockstore(&self, repo: &dyn Repository) -> Result<Arc<dyn BlockStore>, BlockStoreError> {
        assert!(repo.is_open(), "blockstore built over an unopened repo");
        if self.fails(FailAt::Blockstore) {
            return Err(BlockStoreError::Io(io::Error::other("injected")));
        }
        Ok(Arc::new(FakeBlockStore {
            _recorder: self.acquire(SubsystemId::Blockstore),
        }))
    }

    fn routing(
        &self,
        node: &NodeView<'_>,
        private_key: &PrivateKey,
    ) -> Result<Box<dyn Routing>, RoutingError> {
        self.observations.lock().routing_key_owner =
            Some(PeerId::from_public_key(&private_key.public_key()));
        if self.fails(FailAt::Routing) {
            return Err(RoutingError::Unavailable("injected".into()));
        }
        Ok(Box::new(FakeRouting {
            local: node.peer_id(),
            _recorder: self.acquire(SubsystemId::Routing),
        }))
    }

    fn exchange(&self, node: &NodeView<'_>) -> Result<Box<dyn BlockExchange>, ExchangeError> {
        self.observations.lock().exchange_mode = Some(node.mode);
        if self.fails(FailAt::Exchange) {
            return Err(ExchangeError::Unavailable("injected".into()));
        }
        Ok(Box::new(FakeExchange {
            journal: Arc::clone(&self.journal),
            _recorder: self.acquire(SubsystemId::Exchange),
        }))
    }
}
