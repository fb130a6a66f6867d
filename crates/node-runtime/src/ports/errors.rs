//! # Collaborator Errors
//!
//! Error types returned across the outbound ports.

use std::path::PathBuf;

use shared_types::{Cid, IdentityError};
use thiserror::Error;

/// Errors creating or opening a repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The location cannot name a repository at all.
    #[error("Invalid repository path: {0:?}")]
    InvalidPath(String),

    /// Nothing exists at the location.
    #[error("Repository not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The directory exists but holds no repository config.
    #[error("Repository not initialized: {}", .0.display())]
    NotInitialized(PathBuf),

    /// `init` was asked to overwrite an existing repository.
    #[error("Repository already initialized: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Another process (or another node in this one) holds the repository.
    #[error("Repository already in use: {} (holder pid {pid:?})", .path.display())]
    Locked { path: PathBuf, pid: Option<u32> },

    /// The config file could not be parsed.
    #[error("Corrupt repository config {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The stored identity is inconsistent.
    #[error("Invalid repository identity: {0}")]
    Identity(#[from] IdentityError),

    /// Identity requested before the repository was opened.
    #[error("Repository is not open")]
    NotOpen,

    /// Underlying filesystem failure.
    #[error("Repository I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors constructing an in-memory peer or provider table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the content-addressed block store.
#[derive(Debug, Error)]
pub enum BlockStoreError {
    /// Stored bytes no longer hash to their identifier.
    #[error("Block corrupted on disk: {0}")]
    Corrupt(Cid),

    /// The block directory is missing and could not be created.
    #[error("Block directory unavailable: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Block store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors activating or using network routing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The signing key handed to routing does not own the local peer id.
    #[error("Routing key does not match local peer {0}")]
    KeyMismatch(String),

    #[error("Routing unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the block-exchange session.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The session was closed.
    #[error("Exchange session closed")]
    Closed,

    /// Block is not held locally; it has been added to the wantlist.
    #[error("Block not available locally: {0}")]
    NotFound(Cid),

    #[error("Exchange unavailable: {0}")]
    Unavailable(String),

    #[error("Exchange block store error: {0}")]
    BlockStore(#[from] BlockStoreError),
}
