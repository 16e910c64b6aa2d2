//! In-memory key material.
//!
//! Both keys are zeroed when dropped and have no `Debug` output that
//! could leak their bytes into logs.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PassLockError, Result};

/// Length of each derived key (256 bits).
pub const KEY_LEN: usize = 32;

/// Context string for the persisted authentication tag.
const AUTH_TAG_CONTEXT: &[u8] = b"passlock/auth-tag/v1";

/// The AES-256-GCM key that protects record fields.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// The key used only to prove knowledge of the master password.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AuthenticationKey {
    bytes: [u8; KEY_LEN],
}

impl AuthenticationKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// One-way tag stored in the vault metadata: `HMAC-SHA256(key, context)`.
    ///
    /// Disclosure of the tag does not reveal the key itself.
    pub fn auth_tag(&self) -> Result<Vec<u8>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.bytes)
            .map_err(|e| PassLockError::KeyDerivation(format!("HMAC init failed: {e}")))?;
        mac.update(AUTH_TAG_CONTEXT);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// The pair of keys produced by one Argon2id derivation.
pub struct DerivedKeys {
    pub encryption: EncryptionKey,
    pub authentication: AuthenticationKey,
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKeys(***)")
    }
}
