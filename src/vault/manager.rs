//! Vault lifecycle and authentication.
//!
//! `VaultManager` combines key derivation with the store: it creates
//! vaults, checks master passwords, and hands out a `Session` holding
//! the encryption key for one vault.

use std::collections::BTreeSet;

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use super::records::RecordService;
use super::schema::{StoredKdfParams, VaultMetadata};
use super::store::{VaultHandle, VaultStore};
use crate::crypto::{derive_keys, generate_salt, DerivedKeys, EncryptionKey, KdfParams, SALT_LEN};
use crate::errors::{PassLockError, Result};

/// Entry point for vault lifecycle operations.
#[derive(Debug, Clone)]
pub struct VaultManager {
    store: VaultStore,

    /// Parameters applied to newly created vaults.  Existing vaults use
    /// the parameters stored in their own metadata.
    params: KdfParams,
}

impl VaultManager {
    pub fn new(store: VaultStore, params: KdfParams) -> Self {
        Self { store, params }
    }

    /// Manager using the canonical default KDF parameters.
    pub fn with_default_params(store: VaultStore) -> Self {
        Self::new(store, KdfParams::DEFAULT)
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Create a vault protected by `master_password`.
    ///
    /// Does not open a session; call `authenticate` afterwards.
    pub fn create_vault(&self, name: &str, master_password: &[u8]) -> Result<()> {
        // Fail fast before paying for Argon2.
        if self.store.exists(name)? {
            return Err(PassLockError::VaultAlreadyExists(name.to_string()));
        }

        let salt = generate_salt(SALT_LEN)?;
        let keys = derive_keys(master_password, &salt, &self.params)?;
        let auth_tag = keys.authentication.auth_tag()?;
        drop(keys);

        let metadata = VaultMetadata {
            auth_tag,
            salt,
            kdf: stored_params(&self.params)?,
        };
        self.store.create(name, &metadata)
    }

    /// Check `master_password` against the vault and open a session.
    ///
    /// A wrong password yields `AuthenticationDenied`; a missing vault
    /// yields `VaultNotFound`.  Callers facing end users should render
    /// both with `PassLockError::public_message`.
    pub fn authenticate(&self, name: &str, master_password: &[u8]) -> Result<Session> {
        let metadata = self.store.metadata(name).map_err(|e| {
            debug!(vault = name, error = %e, "authentication lookup failed");
            e
        })?;
        let params = kdf_params(&metadata.kdf)?;

        let DerivedKeys {
            encryption,
            authentication,
        } = derive_keys(master_password, &metadata.salt, &params)?;
        let candidate = authentication.auth_tag()?;
        drop(authentication);

        if !bool::from(candidate.as_slice().ct_eq(metadata.auth_tag.as_slice())) {
            warn!(vault = name, "authentication denied");
            return Err(PassLockError::AuthenticationDenied);
        }

        let handle = self.store.open(name)?;
        info!(vault = name, "session opened");
        Ok(Session {
            handle,
            key: encryption,
        })
    }

    pub fn list_vaults(&self) -> Result<BTreeSet<String>> {
        self.store.list_vaults()
    }

    pub fn delete_vault(&self, name: &str) -> Result<()> {
        self.store.destroy(name)
    }
}

/// An authenticated connection to one vault.
///
/// Holds the vault's encryption key (never the password) until dropped,
/// at which point the key is zeroed.
pub struct Session {
    handle: VaultHandle,
    key: EncryptionKey,
}

impl Session {
    /// The vault this session is scoped to.
    pub fn vault_name(&self) -> &str {
        self.handle.name()
    }

    /// Record operations for this session.
    pub fn records(&mut self) -> RecordService<'_> {
        RecordService::new(&mut self.handle, &self.key)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("vault", &self.handle.name())
            .finish_non_exhaustive()
    }
}

fn stored_params(params: &KdfParams) -> Result<StoredKdfParams> {
    let output_len = u32::try_from(params.output_len).map_err(|_| {
        PassLockError::KeyDerivation(format!(
            "Argon2 output length {} exceeds u32::MAX",
            params.output_len
        ))
    })?;
    Ok(StoredKdfParams {
        memory_kib: params.memory_kib,
        iterations: params.iterations,
        parallelism: params.parallelism,
        output_len,
    })
}

fn kdf_params(stored: &StoredKdfParams) -> Result<KdfParams> {
    let output_len = usize::try_from(stored.output_len).map_err(|_| {
        PassLockError::KeyDerivation(format!(
            "stored Argon2 output length {} exceeds platform address space",
            stored.output_len
        ))
    })?;
    Ok(KdfParams {
        memory_kib: stored.memory_kib,
        iterations: stored.iterations,
        parallelism: stored.parallelism,
        output_len,
    })
}
