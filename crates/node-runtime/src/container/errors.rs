//! # Construction Errors

use std::path::PathBuf;

use thiserror::Error;

use crate::container::node::SubsystemId;
use crate::ports::errors::{BlockStoreError, ExchangeError, RepoError, RoutingError, StoreError};

/// Why a node could not be built. Every variant is fatal to that attempt;
/// whatever had been built was released before the error was returned.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The repository handle could not be created for the location.
    #[error("Failed to create repository at {}: {source}", .path.display())]
    RepoCreateFailed { path: PathBuf, source: RepoError },

    /// The repository exists (or was named) but could not be opened.
    #[error("Failed to open repository at {}: {source}", .path.display())]
    RepoOpenFailed { path: PathBuf, source: RepoError },

    #[error("Failed to construct peerstore: {0}")]
    PeerstoreFailed(#[source] StoreError),

    #[error("Failed to construct providerstore: {0}")]
    ProviderstoreFailed(#[source] StoreError),

    #[error("Failed to construct blockstore: {0}")]
    BlockstoreFailed(#[source] BlockStoreError),

    #[error("Failed to activate routing: {0}")]
    RoutingFailed(#[source] RoutingError),

    #[error("Failed to activate exchange: {0}")]
    ExchangeFailed(#[source] ExchangeError),
}

impl ConstructionError {
    /// The subsystem whose construction failed.
    pub fn subsystem(&self) -> SubsystemId {
        match self {
            Self::RepoCreateFailed { .. } | Self::RepoOpenFailed { .. } => SubsystemId::Repo,
            Self::PeerstoreFailed(_) => SubsystemId::Peerstore,
            Self::ProviderstoreFailed(_) => SubsystemId::Providerstore,
            Self::BlockstoreFailed(_) => SubsystemId::Blockstore,
            Self::RoutingFailed(_) => SubsystemId::Routing,
            Self::ExchangeFailed(_) => SubsystemId::Exchange,
        }
    }
}
