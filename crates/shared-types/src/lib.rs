//! # Shared Types Crate
//!
//! Identity and content-addressing types used across the node runtime and its
//! collaborators.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: peer ids, content ids and keys are defined here.
//! - **Identity lives in the repository**: an [`Identity`] is loaded from the
//!   repository configuration; the node only ever borrows it.
//! - **Secrets stay secret**: [`PrivateKey`] never prints its key material.

pub mod entities;
pub mod errors;
pub mod identity;

pub use entities::*;
pub use errors::*;
pub use identity::{Identity, PrivateKey};
