//! On-disk layout of a vault database.
//!
//! Each vault is one SQLite file, `<vault-root>/<name>.sqlite`, with a
//! single-row metadata table and a records table.  Secrets and notes
//! are BLOB columns because they hold raw ciphertext.

use crate::errors::{PassLockError, Result};

/// File extension of a vault database.
pub const VAULT_EXTENSION: &str = "sqlite";

/// Longest accepted vault name.
const MAX_NAME_LEN: usize = 64;

pub(crate) const CREATE_SCHEMA: &str = "
CREATE TABLE vault_metadata (
    vault_name      TEXT PRIMARY KEY,
    auth_tag        BLOB NOT NULL,
    salt            BLOB NOT NULL,
    kdf_memory_kib  INTEGER NOT NULL,
    kdf_iterations  INTEGER NOT NULL,
    kdf_parallelism INTEGER NOT NULL,
    kdf_output_len  INTEGER NOT NULL
);
CREATE TABLE records (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    service    TEXT NOT NULL,
    username   TEXT NOT NULL,
    secret     BLOB NOT NULL,
    notes      BLOB,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX records_service ON records (service);
";

pub(crate) const INSERT_METADATA: &str = "
INSERT INTO vault_metadata
    (vault_name, auth_tag, salt, kdf_memory_kib, kdf_iterations, kdf_parallelism, kdf_output_len)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub(crate) const SELECT_METADATA: &str = "
SELECT auth_tag, salt, kdf_memory_kib, kdf_iterations, kdf_parallelism, kdf_output_len
FROM vault_metadata
WHERE vault_name = ?1";

pub(crate) const RECORD_COLUMNS: &str = "id, service, username, secret, notes, created_at";

/// Argon2 parameters as stored in the metadata row.
///
/// Kept separate from `crypto::KdfParams` so the storage layer has no
/// dependency on the crypto layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredKdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub output_len: u32,
}

/// Authentication metadata persisted once per vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultMetadata {
    /// One-way tag of the authentication key.
    pub auth_tag: Vec<u8>,
    /// Argon2 salt, immutable after creation.
    pub salt: Vec<u8>,
    /// Argon2 parameters used at creation.
    pub kdf: StoredKdfParams,
}

/// Validate that a vault name is safe to use as a file name.
///
/// Allowed: ASCII letters, digits, underscores, hyphens.
/// Must be non-empty, at most 64 characters, and not start with a hyphen.
pub fn validate_vault_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| PassLockError::InvalidVaultName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name cannot exceed 64 characters"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(invalid(
            "only ASCII letters, digits, underscores, and hyphens are allowed",
        ));
    }
    if name.starts_with('-') {
        return Err(invalid("name cannot start with a hyphen"));
    }
    Ok(())
}
