//! # Node Identity
//!
//! A peer id plus the Ed25519 keypair that owns it. Identities are created once
//! when a repository is initialized and loaded from its configuration after
//! that.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use zeroize::Zeroizing;

use crate::entities::PeerId;
use crate::errors::IdentityError;

/// Ed25519 private key.
///
/// `Debug` is redacted; the secret is wiped on drop by `ed25519-dalek`.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Decode a hex-encoded 32-byte seed.
    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        let bytes = Zeroizing::new(
            hex::decode(s).map_err(|e| IdentityError::InvalidKeyEncoding(e.to_string()))?,
        );
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| IdentityError::InvalidKeyLength(bytes.len()))?;
        Ok(Self::from_seed(seed))
    }

    /// Hex-encode the secret seed for persistence.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing_key.to_bytes()))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Check a signature produced by this key.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        let sig = ed25519_dalek::Signature::from_bytes(signature);
        self.signing_key
            .verifying_key()
            .verify_strict(message, &sig)
            .is_ok()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A peer's id together with its private key.
#[derive(Debug, Clone)]
pub struct Identity {
    pub peer_id: PeerId,
    pub private_key: PrivateKey,
}

impl Identity {
    /// Generate a new identity with a random key.
    pub fn generate() -> Self {
        let private_key = PrivateKey::generate();
        Self {
            peer_id: PeerId::from_public_key(&private_key.public_key()),
            private_key,
        }
    }

    /// Rebuild an identity from stored parts, rejecting a peer id that the key
    /// does not derive.
    pub fn from_parts(peer_id: PeerId, private_key: PrivateKey) -> Result<Self, IdentityError> {
        let derived = PeerId::from_public_key(&private_key.public_key());
        if derived != peer_id {
            return Err(IdentityError::PeerIdMismatch {
                stored: peer_id.to_hex(),
                derived: derived.to_hex(),
            });
        }
        Ok(Self {
            peer_id,
            private_key,
        })
    }
}
