//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Content**: `Cid`, `Block`
//! - **Networking**: `PeerId`, `Mode`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::ParseIdError;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Length of the hex rendering of a [`Hash`].
const HASH_HEX_LEN: usize = 64;

fn sha256(data: &[u8]) -> Hash {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn parse_hash(s: &str) -> Result<Hash, ParseIdError> {
    if s.len() != HASH_HEX_LEN {
        return Err(ParseIdError::InvalidLength {
            expected: HASH_HEX_LEN,
            actual: s.len(),
        });
    }
    let bytes = hex::decode(s).map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// =============================================================================
// CLUSTER A: CONTENT
// =============================================================================

/// Content identifier: the SHA-256 digest of a block's bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(Hash);

impl Cid {
    /// Compute the identifier of `data`.
    pub fn of(data: &[u8]) -> Self {
        Self(sha256(data))
    }

    pub fn from_bytes(bytes: Hash) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({}..)", &self.to_hex()[..12])
    }
}

impl FromStr for Cid {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash(s).map(Self)
    }
}

impl TryFrom<String> for Cid {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.to_hex()
    }
}

/// An immutable block of content together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    /// Wrap `data`, computing its identifier.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        Self {
            cid: Cid::of(&data),
            data,
        }
    }

    /// Rebuild a block read back from storage, checking it still hashes to `cid`.
    pub fn from_parts(cid: Cid, data: Vec<u8>) -> Option<Self> {
        if Cid::of(&data) == cid {
            Some(Self { cid, data })
        } else {
            None
        }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

// =============================================================================
// CLUSTER B: NETWORKING
// =============================================================================

/// Unique identifier for a peer: SHA-256 of its Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerId(Hash);

impl PeerId {
    /// Derive the peer id owned by `public_key`.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        Self(sha256(public_key))
    }

    pub fn from_bytes(bytes: Hash) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.short())
    }
}

impl FromStr for PeerId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hash(s).map(Self)
    }
}

impl TryFrom<String> for PeerId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeerId> for String {
    fn from(id: PeerId) -> Self {
        id.to_hex()
    }
}

/// Activation level of a node.
///
/// `Online` means network routing was activated and must be released on
/// teardown; `Offline` means it never was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Offline,
    Online,
}

impl Mode {
    pub fn is_online(&self) -> bool {
        matches!(self, Mode::Online)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Offline => f.write_str("offline"),
            Mode::Online => f.write_str("online"),
        }
    }
}
