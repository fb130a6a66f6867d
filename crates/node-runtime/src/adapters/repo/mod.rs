//! # Filesystem Repository
//!
//! On-disk repository holding the node's configuration, identity and blocks.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── config        JSON: format version + identity (peer id, private key)
//! ├── blocks/       one file per block, named by CID
//! └── repo.lock     exclusive lock while a node has the repository open
//! ```

pub mod lock;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use shared_types::{Identity, PeerId, PrivateKey};

use crate::ports::errors::RepoError;
use crate::ports::outbound::Repository;

pub use lock::RepoLock;

/// Config file format written by [`FsRepo::init`].
pub const REPO_VERSION: u32 = 1;

/// Serialized repository config.
#[derive(Debug, Serialize, Deserialize)]
struct RepoConfigFile {
    version: u32,
    identity: IdentityConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct IdentityConfig {
    peer_id: PeerId,
    private_key: String,
}

/// State that exists only while the repository is open.
#[derive(Debug)]
struct OpenState {
    identity: Identity,
    _lock: RepoLock,
}

/// Filesystem-backed repository.
#[derive(Debug)]
pub struct FsRepo {
    root: PathBuf,
    blocks_dir: PathBuf,
    lock_timeout: Duration,
    open: Option<OpenState>,
}

impl FsRepo {
    /// Config file name
    pub const CONFIG_FILE: &'static str = "config";
    /// Block directory name
    pub const BLOCKS_DIR: &'static str = "blocks";

    /// Build an unopened handle for the repository at `path`.
    ///
    /// Touches nothing on disk.
    pub fn new(path: impl AsRef<Path>, lock_timeout: Duration) -> Result<Self, RepoError> {
        let root = path.as_ref();
        if root.as_os_str().is_empty() {
            return Err(RepoError::InvalidPath(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            blocks_dir: root.join(Self::BLOCKS_DIR),
            lock_timeout,
            open: None,
        })
    }

    /// Initialize a repository at `path` with a freshly generated identity.
    ///
    /// Creates the directory if needed. Refuses to overwrite an existing
    /// config; when several callers race, exactly one config is written and
    /// the others get `AlreadyInitialized`.
    pub fn init(path: impl AsRef<Path>) -> Result<Identity, RepoError> {
        let root = path.as_ref();
        if root.as_os_str().is_empty() {
            return Err(RepoError::InvalidPath(root.display().to_string()));
        }
        let config_path = root.join(Self::CONFIG_FILE);
        if config_path.exists() {
            return Err(RepoError::AlreadyInitialized(root.to_path_buf()));
        }

        fs::create_dir_all(root.join(Self::BLOCKS_DIR))?;

        let identity = Identity::generate();
        let config = RepoConfigFile {
            version: REPO_VERSION,
            identity: IdentityConfig {
                peer_id: identity.peer_id,
                private_key: identity.private_key.to_hex().to_string(),
            },
        };
        let bytes = serde_json::to_vec_pretty(&config).map_err(|e| RepoError::Corrupt {
            path: config_path.clone(),
            reason: e.to_string(),
        })?;

        let mut tmp = NamedTempFile::new_in(root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&config_path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RepoError::AlreadyInitialized(root.to_path_buf()));
            }
            Err(e) => return Err(e.error.into()),
        }

        info!(
            "Initialized repository {} for peer {}",
            root.display(),
            identity.peer_id
        );
        Ok(identity)
    }

    /// Whether `path` holds an initialized repository.
    pub fn is_initialized(path: impl AsRef<Path>) -> bool {
        path.as_ref().join(Self::CONFIG_FILE).is_file()
    }

    fn read_identity(&self) -> Result<Identity, RepoError> {
        let config_path = self.root.join(Self::CONFIG_FILE);
        let bytes = fs::read(&config_path)?;
        let config: RepoConfigFile =
            serde_json::from_slice(&bytes).map_err(|e| RepoError::Corrupt {
                path: config_path.clone(),
                reason: e.to_string(),
            })?;
        if config.version != REPO_VERSION {
            return Err(RepoError::Corrupt {
                path: config_path,
                reason: format!(
                    "unsupported version {} (expected {})",
                    config.version, REPO_VERSION
                ),
            });
        }

        let private_key = PrivateKey::from_hex(&config.identity.private_key)?;
        Ok(Identity::from_parts(config.identity.peer_id, private_key)?)
    }
}

impl Repository for FsRepo {
    fn open(&mut self) -> Result<(), RepoError> {
        if self.open.is_some() {
            return Ok(());
        }
        if !self.root.is_dir() {
            return Err(RepoError::NotFound(self.root.clone()));
        }
        if !Self::is_initialized(&self.root) {
            return Err(RepoError::NotInitialized(self.root.clone()));
        }

        // Lock before reading so the config cannot change under us. On any
        // error below the lock is dropped again and the handle stays closed.
        let lock = RepoLock::acquire(&self.root, self.lock_timeout)?;
        let identity = self.read_identity()?;
        if !self.blocks_dir.is_dir() {
            fs::create_dir_all(&self.blocks_dir)?;
        }

        debug!("Opened repository {}", self.root.display());
        self.open = Some(OpenState {
            identity,
            _lock: lock,
        });
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn blocks_dir(&self) -> &Path {
        &self.blocks_dir
    }

    fn identity(&self) -> Option<&Identity> {
        self.open.as_ref().map(|state| &state.identity)
    }
}

impl Drop for FsRepo {
    fn drop(&mut self) {
        if self.open.take().is_some() {
            debug!("Closed repository {}", self.root.display());
        }
    }
}
