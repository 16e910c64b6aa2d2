//! Password-based key derivation using Argon2id.
//!
//! One Argon2id run over `(password, salt)` produces a 64-byte buffer
//! that is split into two independent keys:
//!
//! ```text
//! [ encryption key: 32 bytes | authentication key: 32 bytes ]
//! ```
//!
//! Only a one-way tag of the authentication key is ever persisted, so
//! the encryption key never has to leave memory to check a password.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::TryRngCore;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{AuthenticationKey, DerivedKeys, EncryptionKey, KEY_LEN};
use crate::errors::{PassLockError, Result};

/// Default salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Minimum Argon2 output: one encryption key plus one authentication key.
pub const MIN_OUTPUT_LEN: usize = 2 * KEY_LEN;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id cost parameters.
///
/// The values a vault was created with are stored in its metadata, so
/// changing the defaults only affects vaults created afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
    /// Length of the raw Argon2 output in bytes (default: 64).
    pub output_len: usize,
}

impl KdfParams {
    /// The canonical parameters used for new vaults.
    pub const DEFAULT: Self = Self {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 4,
        output_len: MIN_OUTPUT_LEN,
    };

    /// Reject parameters that are zero or dangerously weak.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(PassLockError::KeyDerivation(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(PassLockError::KeyDerivation(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(PassLockError::KeyDerivation(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        if self.output_len < MIN_OUTPUT_LEN {
            return Err(PassLockError::KeyDerivation(format!(
                "Argon2 output length must be at least {MIN_OUTPUT_LEN} bytes (got {})",
                self.output_len
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derive the encryption and authentication keys for `password` + `salt`.
///
/// The same inputs always produce the same pair of keys.
pub fn derive_keys(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKeys> {
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(params.output_len),
    )
    .map_err(|e| PassLockError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut output = Zeroizing::new(vec![0u8; params.output_len]);
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| PassLockError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    let mut encryption = [0u8; KEY_LEN];
    let mut authentication = [0u8; KEY_LEN];
    encryption.copy_from_slice(&output[..KEY_LEN]);
    authentication.copy_from_slice(&output[KEY_LEN..2 * KEY_LEN]);

    let keys = DerivedKeys {
        encryption: EncryptionKey::new(encryption),
        authentication: AuthenticationKey::new(authentication),
    };
    encryption.zeroize();
    authentication.zeroize();
    Ok(keys)
}

/// Generate `size` bytes of salt from the OS random source.
pub fn generate_salt(size: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; size];
    fill_random(&mut salt)?;
    Ok(salt)
}

/// Fill `buf` from the OS CSPRNG, reporting entropy failures instead of panicking.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    rand::rngs::OsRng
        .try_fill_bytes(buf)
        .map_err(|e| PassLockError::RandomSource(e.to_string()))
}
