//! # Node Configuration
//!
//! Runtime parameters for constructing a node, with environment overrides.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NODE_REPO_PATH` | `$HOME/.content-node` | Repository location |
//! | `NODE_OFFLINE` | unset | `1`/`true` skips routing activation |
//! | `NODE_LOCK_TIMEOUT_SECS` | `5` | Max wait for the repository lock |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::adapters::DefaultSubsystems;
use crate::container::composer::NodeOptions;

/// Repository directory name under `$HOME`.
pub const DEFAULT_REPO_DIR: &str = ".content-node";

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Network configuration.
    pub network: NetworkConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Repository path is empty")]
    EmptyRepoPath,

    #[error("Repository lock timeout must be non-zero")]
    ZeroLockTimeout,
}

impl NodeConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("NODE_REPO_PATH") {
            config.storage.repo_path = PathBuf::from(path);
        }

        if let Ok(val) = std::env::var("NODE_OFFLINE") {
            config.network.online = !(val == "1" || val.eq_ignore_ascii_case("true"));
        }

        if let Ok(secs) = std::env::var("NODE_LOCK_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(s) => config.storage.lock_timeout_secs = s,
                Err(_) => warn!("NODE_LOCK_TIMEOUT_SECS must be an integer, got {:?}", secs),
            }
        }

        config
    }

    /// Check the configuration before using it to build a node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.repo_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRepoPath);
        }
        if self.storage.lock_timeout_secs == 0 {
            return Err(ConfigError::ZeroLockTimeout);
        }
        Ok(())
    }

    /// Construction options derived from this configuration.
    pub fn options(&self) -> NodeOptions {
        NodeOptions {
            online: self.network.online,
        }
    }

    /// Default collaborators configured from this configuration.
    pub fn subsystems(&self) -> DefaultSubsystems {
        DefaultSubsystems::new(self.storage.lock_timeout())
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Repository directory.
    pub repo_path: PathBuf,
    /// How long to wait for another holder to release the repository lock.
    pub lock_timeout_secs: u64,
}

impl StorageConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            repo_path: home.join(DEFAULT_REPO_DIR),
            lock_timeout_secs: 5,
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Activate routing on construction.
    pub online: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { online: true }
    }
}
