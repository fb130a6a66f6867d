//! # Node Composer
//!
//! Builds the node's object graph in dependency order.
//!
//! ## Construction Order
//!
//! ```text
//! 1. Allocate the record (every field absent)
//! 2. Open the repository
//! 3. Derive identity from the repository config (borrowed, never copied)
//! 4. Peerstore, seeded with our peer id
//! 5. Providerstore
//! 6. Blockstore over the repository
//! 7. Mode = Offline
//! 8. Routing (Online only); mode becomes Online with it
//! 9. Exchange, given the wired node
//! ```
//!
//! ## Unwind
//!
//! Each step returns early with `?` on failure. The partially built record is
//! dropped on the way out, and its `Drop` runs the dismantler, so exactly the
//! subsystems built so far are released and no node reaches the caller.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::adapters::DefaultSubsystems;
use crate::container::errors::ConstructionError;
use crate::container::node::{Network, Node};
use crate::ports::errors::RepoError;
use crate::ports::outbound::SubsystemFactory;

/// Options for a single construction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeOptions {
    /// Activate network routing. Offline nodes never hold a routing handle.
    pub online: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self { online: true }
    }
}

impl NodeOptions {
    pub fn offline() -> Self {
        Self { online: false }
    }
}

/// Build an online node over the repository at `repo_path` using the default
/// filesystem and in-memory collaborators.
pub fn construct(repo_path: impl AsRef<Path>) -> Result<Node, ConstructionError> {
    construct_with(
        repo_path,
        NodeOptions::default(),
        &DefaultSubsystems::default(),
    )
}

/// Build a node using `factory` for every collaborator.
#[instrument(name = "node_construct", skip_all, fields(repo = %repo_path.as_ref().display(), online = options.online))]
pub fn construct_with(
    repo_path: impl AsRef<Path>,
    options: NodeOptions,
    factory: &dyn SubsystemFactory,
) -> Result<Node, ConstructionError> {
    let repo_path = repo_path.as_ref();

    // Step 1: record first, so every later failure unwinds through Drop.
    let mut node = Node::empty();
    debug!(instance = %node.instance_id, "Allocated node record");

    let result = compose(&mut node, repo_path, options, factory);
    match result {
        Ok(()) => {
            info!(
                instance = %node.instance_id,
                mode = %node.mode(),
                "Node constructed"
            );
            Ok(node)
        }
        Err(e) => {
            warn!(
                instance = %node.instance_id,
                subsystem = e.subsystem().name(),
                "Node construction failed, unwinding: {}",
                e
            );
            drop(node);
            Err(e)
        }
    }
}

fn compose(
    node: &mut Node,
    repo_path: &Path,
    options: NodeOptions,
    factory: &dyn SubsystemFactory,
) -> Result<(), ConstructionError> {
    // Step 2: repository. Only an opened repository enters the record; an
    // unopened handle is dropped right here.
    let mut repo =
        factory
            .repository(repo_path)
            .map_err(|source| ConstructionError::RepoCreateFailed {
                path: repo_path.to_path_buf(),
                source,
            })?;
    repo.open()
        .map_err(|source| ConstructionError::RepoOpenFailed {
            path: repo_path.to_path_buf(),
            source,
        })?;
    node.repo = Some(repo);
    info!("  [repo] opened {}", repo_path.display());

    // Step 3: identity lives in the repo config.
    let peer_id = node.peer_id().ok_or_else(|| not_open(repo_path))?;
    info!("  [identity] peer {}", peer_id);

    // Step 4
    node.peerstore = Some(
        factory
            .peerstore(&peer_id)
            .map_err(ConstructionError::PeerstoreFailed)?,
    );
    info!("  [peerstore] initialized");

    // Step 5
    node.providerstore = Some(
        factory
            .providerstore()
            .map_err(ConstructionError::ProviderstoreFailed)?,
    );
    info!("  [providerstore] initialized");

    // Step 6
    let repo = node.repo.as_deref().ok_or_else(|| not_open(repo_path))?;
    let blockstore = factory
        .blockstore(repo)
        .map_err(ConstructionError::BlockstoreFailed)?;
    node.blockstore = Some(blockstore);
    info!("  [blockstore] initialized");

    // Step 7
    node.network = Network::Offline;

    // Step 8
    if options.online {
        let routing = {
            let view = node.view().ok_or_else(|| not_open(repo_path))?;
            factory
                .routing(&view, &view.identity.private_key)
                .map_err(ConstructionError::RoutingFailed)?
        };
        node.activate_routing(routing);
        info!("  [routing] activated, mode={}", node.mode());
    } else {
        info!("  [routing] skipped, mode={}", node.mode());
    }

    // Step 9
    let exchange = {
        let view = node.view().ok_or_else(|| not_open(repo_path))?;
        factory
            .exchange(&view)
            .map_err(ConstructionError::ExchangeFailed)?
    };
    node.exchange = Some(exchange);
    info!("  [exchange] activated");

    Ok(())
}

/// The repository handle reported success but exposes no identity.
fn not_open(repo_path: &Path) -> ConstructionError {
    ConstructionError::RepoOpenFailed {
        path: repo_path.to_path_buf(),
        source: RepoError::NotOpen,
    }
}
