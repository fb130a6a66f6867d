//! # Block Exchange
//!
//! Want-list based block exchange over the node's block store.
//!
//! - `get_block` serves from the local store, otherwise records a want
//! - `has_block` stores an incoming block, clears the want, and (online only)
//!   announces the local peer as a provider
//! - `close` clears the want-list; every later call returns `Closed`
//!
//! The session holds `Weak` store handles. Once the node releases a store,
//! calls that need it return `Unavailable`.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use shared_types::{Block, Cid, Mode, PeerId};

use crate::ports::errors::ExchangeError;
use crate::ports::outbound::{BlockExchange, BlockStore, Exchange, NodeView, ProviderStore};

/// Block-exchange session started by the composer.
pub struct Bitswap {
    local: PeerId,
    mode: Mode,
    blockstore: Weak<dyn BlockStore>,
    providerstore: Weak<dyn ProviderStore>,
    wantlist: Mutex<BTreeSet<Cid>>,
    closed: AtomicBool,
}

impl Bitswap {
    /// Start a session for `node`.
    pub fn start(node: &NodeView<'_>) -> Self {
        info!(peer = %node.peer_id().short(), mode = %node.mode, "exchange session started");
        Self {
            local: node.peer_id(),
            mode: node.mode,
            blockstore: Arc::downgrade(node.blockstore),
            providerstore: Arc::downgrade(node.providerstore),
            wantlist: Mutex::new(BTreeSet::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Mode the node was in when the session started.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), ExchangeError> {
        if self.is_closed() {
            Err(ExchangeError::Closed)
        } else {
            Ok(())
        }
    }

    fn blockstore(&self) -> Result<Arc<dyn BlockStore>, ExchangeError> {
        self.blockstore
            .upgrade()
            .ok_or_else(|| ExchangeError::Unavailable("blockstore released".into()))
    }
}

impl BlockExchange for Bitswap {
    #[instrument(skip_all, fields(cid = %cid))]
    fn get_block(&self, cid: &Cid) -> Result<Block, ExchangeError> {
        self.ensure_open()?;
        if let Some(block) = self.blockstore()?.get(cid)? {
            return Ok(block);
        }
        self.wantlist.lock().insert(*cid);
        debug!("added to wantlist");
        Err(ExchangeError::NotFound(*cid))
    }

    fn has_block(&self, block: &Block) -> Result<(), ExchangeError> {
        self.ensure_open()?;
        self.blockstore()?.put(block)?;
        self.wantlist.lock().remove(block.cid());
        if self.mode.is_online() {
            match self.providerstore.upgrade() {
                Some(providers) => providers.add_provider(*block.cid(), self.local),
                None => debug!(cid = %block.cid(), "providerstore released, not announcing"),
            }
        }
        Ok(())
    }

    fn wantlist(&self) -> Vec<Cid> {
        self.wantlist.lock().iter().copied().collect()
    }
}

impl Exchange for Bitswap {
    fn close(&mut self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("exchange session already closed");
            return;
        }
        let dropped = {
            let mut wants = self.wantlist.lock();
            let n = wants.len();
            wants.clear();
            n
        };
        info!(wants = dropped, "exchange session closed");
    }
}
