//! # Node Container
//!
//! The node record together with the two operations that create and destroy
//! it as a unit.
//!
//! - Subsystems are built in dependency order (repo → stores → routing → exchange)
//! - A failed construction releases exactly what it built and returns no node
//! - Teardown releases routing only when the node went online

pub mod composer;
pub mod config;
pub mod dismantler;
pub mod errors;
pub mod node;

pub use composer::{construct, construct_with, NodeOptions};
pub use config::{ConfigError, NodeConfig};
pub use dismantler::destroy;
pub use errors::ConstructionError;
pub use node::{Node, SubsystemId};
