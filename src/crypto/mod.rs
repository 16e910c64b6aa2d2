//! Cryptographic primitives for PassLock.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Zeroizing key types and the one-way authentication tag (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_keys, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_keys, generate_salt, KdfParams, SALT_LEN};
pub use keys::{AuthenticationKey, DerivedKeys, EncryptionKey};
