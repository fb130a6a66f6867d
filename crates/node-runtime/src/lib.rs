//! # Node Runtime Library
//!
//! Lifecycle and resource ownership for one content node instance.
//!
//! ## Modules
//!
//! - `container/` - the node record, its composer and its dismantler
//! - `ports/` - outbound traits for every collaborator the node owns
//! - `adapters/` - default filesystem / in-memory collaborators
//!
//! ## Usage
//!
//! ```ignore
//! use node_runtime::{construct, destroy};
//!
//! let node = construct("/var/lib/content-node")?;
//! println!("running as {}", node.peer_id().unwrap());
//! destroy(Some(node));
//! ```

pub mod adapters;
pub mod container;
pub mod ports;

pub use adapters::DefaultSubsystems;
pub use container::{
    construct, construct_with, destroy, ConfigError, ConstructionError, Node, NodeConfig,
    NodeOptions, SubsystemId,
};
pub use ports::outbound::SubsystemFactory;
pub use shared_types::Mode;
