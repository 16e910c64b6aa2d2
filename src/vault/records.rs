//! Record operations inside an authenticated session.
//!
//! This is the only layer that turns plaintext into ciphertext and back;
//! the store below it sees nothing but opaque blobs.

use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use super::record::{Entry, StoredRecord};
use super::store::VaultHandle;
use crate::crypto::{decrypt, encrypt, EncryptionKey};
use crate::errors::{PassLockError, Result};

/// CRUD over one vault's records, borrowed from a `Session`.
///
/// The borrow ties the key's use to the session: a `RecordService`
/// cannot outlive the session that produced it.
pub struct RecordService<'s> {
    handle: &'s mut VaultHandle,
    key: &'s EncryptionKey,
}

impl<'s> RecordService<'s> {
    pub(crate) fn new(handle: &'s mut VaultHandle, key: &'s EncryptionKey) -> Self {
        Self { handle, key }
    }

    /// Encrypt and store a new record, returning the plaintext view.
    pub fn add_record(
        &mut self,
        service: &str,
        username: &str,
        secret: &str,
        notes: Option<&str>,
    ) -> Result<Entry> {
        let encrypted_secret = encrypt(self.key, secret.as_bytes())?;
        let encrypted_notes = notes
            .map(|n| encrypt(self.key, n.as_bytes()))
            .transpose()?;

        let stored = self.handle.insert_record(
            service,
            username,
            &encrypted_secret,
            encrypted_notes.as_deref(),
        )?;

        Ok(Entry {
            id: stored.id,
            service: stored.service,
            username: stored.username,
            secret: Zeroizing::new(secret.to_string()),
            notes: notes.map(|n| Zeroizing::new(n.to_string())),
            created_at: stored.created_at,
        })
    }

    /// Fetch and decrypt one record.
    pub fn get_record(&self, id: i64) -> Result<Entry> {
        let stored = self.handle.get_record(id)?;
        self.open_record(stored)
    }

    /// Decrypt every record for `service` (exact match), oldest first.
    pub fn list_by_service(&self, service: &str) -> Result<Vec<Entry>> {
        let stored = self.handle.list_records_by_service(service)?;
        debug!(vault = self.handle.name(), count = stored.len(), "listed by service");
        stored.into_iter().map(|r| self.open_record(r)).collect()
    }

    /// Decrypt every record in the vault, oldest first.
    pub fn list_all(&self) -> Result<Vec<Entry>> {
        let stored = self.handle.list_all_records()?;
        debug!(vault = self.handle.name(), count = stored.len(), "listed all");
        stored.into_iter().map(|r| self.open_record(r)).collect()
    }

    pub fn delete_record(&mut self, id: i64) -> Result<()> {
        self.handle.delete_record(id)
    }

    /// Remove every record; the vault and its password stay as they are.
    pub fn clear_vault(&mut self) -> Result<()> {
        self.handle.clear()
    }

    fn open_record(&self, stored: StoredRecord) -> Result<Entry> {
        let id = stored.id;
        let secret = self.decrypt_field(id, &stored.encrypted_secret)?;
        let notes = stored
            .encrypted_notes
            .as_deref()
            .map(|blob| self.decrypt_field(id, blob))
            .transpose()?;

        Ok(Entry {
            id,
            service: stored.service,
            username: stored.username,
            secret,
            notes,
            created_at: stored.created_at,
        })
    }

    /// Decrypt one field.  Every failure, including plaintext that is not
    /// UTF-8, is reported as a corrupt record rather than a missing one.
    fn decrypt_field(&self, id: i64, blob: &[u8]) -> Result<Zeroizing<String>> {
        let plaintext = decrypt(self.key, blob).map_err(|e| match e {
            PassLockError::AuthenticationFailure | PassLockError::MalformedCiphertext { .. } => {
                debug!(vault = self.handle.name(), id, error = %e, "record failed to decrypt");
                PassLockError::RecordCorruptOrWrongKey(id)
            }
            other => other,
        })?;

        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PassLockError::RecordCorruptOrWrongKey(id)
        })
    }
}
