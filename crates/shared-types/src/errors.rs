//! # Error Types
//!
//! Defines error types for parsing and validating shared types.

use thiserror::Error;

/// Errors parsing a hex-encoded [`crate::Cid`] or [`crate::PeerId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIdError {
    /// Input has the wrong number of hex characters.
    #[error("Invalid length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input is not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Errors loading or validating a node identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Private key material has the wrong size.
    #[error("Invalid private key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Private key is not valid hex.
    #[error("Invalid private key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Stored peer id does not belong to the stored key.
    #[error("Peer id mismatch: config says {stored}, key derives {derived}")]
    PeerIdMismatch { stored: String, derived: String },
}
