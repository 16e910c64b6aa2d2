//! Per-vault SQLite storage.
//!
//! `VaultStore` manages the vault root directory: creating, listing,
//! and destroying vault files, and reading their authentication
//! metadata.  `VaultHandle` is an open connection to one vault and
//! carries the record operations.
//!
//! The store never interprets ciphertext; secrets and notes go in and
//! come out as opaque byte blobs.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info};

use super::record::{parse_timestamp, StoredRecord};
use super::schema::{
    validate_vault_name, StoredKdfParams, VaultMetadata, CREATE_SCHEMA, INSERT_METADATA,
    RECORD_COLUMNS, SELECT_METADATA, VAULT_EXTENSION,
};
use crate::crypto::kdf::fill_random;
use crate::errors::{PassLockError, Result, StorageError};

/// How long a connection waits for another writer before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the vault root directory.
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Directory holding one `<name>.sqlite` file per vault.
    root: PathBuf,

    /// Busy timeout applied to every connection.
    busy_timeout: Duration,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Use `root` as the vault directory.  The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Override the SQLite busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    // ------------------------------------------------------------------
    // Vault lifecycle
    // ------------------------------------------------------------------

    /// Create a new vault file holding `metadata` and an empty records table.
    ///
    /// The database is built under a hidden temporary name inside a single
    /// transaction, then hard-linked into place.  Linking fails if the
    /// target exists, so a concurrent creator can never be clobbered, and
    /// a failure at any step leaves no file under the vault's name.
    pub fn create(&self, name: &str, metadata: &VaultMetadata) -> Result<()> {
        validate_vault_name(name)?;
        let path = self.vault_path(name);
        if path.exists() {
            return Err(PassLockError::VaultAlreadyExists(name.to_string()));
        }

        let tmp_path = self.scratch_path(name, "tmp")?;
        let built = self.build_vault_file(&tmp_path, name, metadata);
        let linked = built.and_then(|()| match fs::hard_link(&tmp_path, &path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(PassLockError::VaultAlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        });

        remove_if_exists(&tmp_path)?;
        remove_if_exists(&sidecar(&tmp_path, "-journal"))?;
        linked?;

        info!(vault = name, "vault created");
        Ok(())
    }

    /// Open an existing vault for record operations.
    pub fn open(&self, name: &str) -> Result<VaultHandle> {
        let conn = self.connect(name, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        conn.execute_batch("PRAGMA secure_delete = ON;")?;
        debug!(vault = name, "vault opened");
        Ok(VaultHandle {
            name: name.to_string(),
            conn,
        })
    }

    /// Returns `true` if a vault file exists for `name`.
    pub fn exists(&self, name: &str) -> Result<bool> {
        validate_vault_name(name)?;
        Ok(self.vault_path(name).is_file())
    }

    /// Enumerate every vault in the root directory.
    ///
    /// Hidden files (in-flight creations and deletions) and files whose
    /// stem is not a valid vault name are skipped.
    pub fn list_vaults(&self) -> Result<BTreeSet<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(e.into()),
        };

        let mut vaults = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(VAULT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_vault_name(stem).is_ok() {
                    vaults.insert(stem.to_string());
                }
            }
        }

        Ok(vaults)
    }

    /// Permanently delete a vault and everything in it.
    ///
    /// The file is first renamed to a hidden tombstone, which atomically
    /// makes the name unresolvable, then removed.
    pub fn destroy(&self, name: &str) -> Result<()> {
        validate_vault_name(name)?;
        let path = self.vault_path(name);
        let tombstone = self.scratch_path(name, "deleting")?;

        match fs::rename(&path, &tombstone) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PassLockError::VaultNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        for suffix in ["-journal", "-wal", "-shm"] {
            remove_if_exists(&sidecar(&path, suffix))?;
        }
        fs::remove_file(&tombstone)?;

        info!(vault = name, "vault destroyed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata accessors
    // ------------------------------------------------------------------

    /// Read the full authentication metadata row.
    pub fn metadata(&self, name: &str) -> Result<VaultMetadata> {
        let conn = self.connect(name, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        conn.query_row(SELECT_METADATA, params![name], |row| {
            Ok(VaultMetadata {
                auth_tag: row.get(0)?,
                salt: row.get(1)?,
                kdf: StoredKdfParams {
                    memory_kib: row.get(2)?,
                    iterations: row.get(3)?,
                    parallelism: row.get(4)?,
                    output_len: row.get(5)?,
                },
            })
        })
        .optional()?
        .ok_or_else(|| PassLockError::VaultNotFound(name.to_string()))
    }

    pub fn get_salt(&self, name: &str) -> Result<Vec<u8>> {
        Ok(self.metadata(name)?.salt)
    }

    pub fn get_auth_tag(&self, name: &str) -> Result<Vec<u8>> {
        Ok(self.metadata(name)?.auth_tag)
    }

    pub fn get_kdf_params(&self, name: &str) -> Result<StoredKdfParams> {
        Ok(self.metadata(name)?.kdf)
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the full path to a vault file.
    ///
    /// Example: `<root>/work.sqlite`
    pub fn vault_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{VAULT_EXTENSION}"))
    }

    /// A hidden, unique sibling path used during create/destroy.
    fn scratch_path(&self, name: &str, purpose: &str) -> Result<PathBuf> {
        let mut nonce = [0u8; 8];
        fill_random(&mut nonce)?;
        Ok(self.root.join(format!(
            ".{name}.{VAULT_EXTENSION}.{:016x}.{purpose}",
            u64::from_le_bytes(nonce)
        )))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Open a connection to an existing vault without ever creating one.
    fn connect(&self, name: &str, mode: OpenFlags) -> Result<Connection> {
        validate_vault_name(name)?;
        let path = self.vault_path(name);
        if !path.is_file() {
            return Err(PassLockError::VaultNotFound(name.to_string()));
        }

        let conn = Connection::open_with_flags(&path, mode | OpenFlags::SQLITE_OPEN_NO_MUTEX)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Write schema and metadata into a fresh database at `tmp_path`.
    fn build_vault_file(&self, tmp_path: &Path, name: &str, metadata: &VaultMetadata) -> Result<()> {
        let mut conn = Connection::open_with_flags(
            tmp_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Restrict the vault file to the owner.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_SCHEMA)?;
        tx.execute(
            INSERT_METADATA,
            params![
                name,
                metadata.auth_tag,
                metadata.salt,
                metadata.kdf.memory_kib,
                metadata.kdf.iterations,
                metadata.kdf.parallelism,
                metadata.kdf.output_len,
            ],
        )?;
        tx.commit()?;

        conn.close().map_err(|(_, e)| PassLockError::from(e))
    }
}

/// An open connection to one vault.
///
/// Mutating operations take `&mut self` and run inside `BEGIN IMMEDIATE`
/// transactions, so SQLite serializes writers across processes.
pub struct VaultHandle {
    name: String,
    conn: Connection,
}

impl VaultHandle {
    /// The vault this handle belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a record and return it as persisted, with its `id` and `created_at`.
    pub fn insert_record(
        &mut self,
        service: &str,
        username: &str,
        encrypted_secret: &[u8],
        encrypted_notes: Option<&[u8]>,
    ) -> Result<StoredRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO records (service, username, secret, notes) VALUES (?1, ?2, ?3, ?4)",
            params![service, username, encrypted_secret, encrypted_notes],
        )?;
        let id = tx.last_insert_rowid();
        let record = tx.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
            params![id],
            record_from_row,
        )?;
        tx.commit()?;

        debug!(vault = %self.name, id, "record inserted");
        Ok(record)
    }

    pub fn get_record(&self, id: i64) -> Result<StoredRecord> {
        self.conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
                params![id],
                record_from_row,
            )
            .optional()?
            .ok_or(PassLockError::RecordNotFound(id))
    }

    /// All records whose service equals `service` exactly, in insertion order.
    pub fn list_records_by_service(&self, service: &str) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE service = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![service], record_from_row)?;
        collect_rows(rows)
    }

    /// Every record in insertion order.
    pub fn list_all_records(&self) -> Result<Vec<StoredRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY id"))?;
        let rows = stmt.query_map([], record_from_row)?;
        collect_rows(rows)
    }

    /// Delete a record.  Deleting an id that does not exist is not an error.
    pub fn delete_record(&mut self, id: i64) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM records WHERE id = ?1", params![id])?;
        tx.commit()?;

        debug!(vault = %self.name, id, removed, "record delete");
        Ok(())
    }

    /// Delete every record, keeping the metadata row and schema.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM records", [])?;
        tx.commit()?;

        info!(vault = %self.name, removed, "vault cleared");
        Ok(())
    }
}

impl std::fmt::Debug for VaultHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    let raw_ts: String = row.get(5)?;
    let created_at = parse_timestamp(&raw_ts)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(StoredRecord {
        id: row.get(0)?,
        service: row.get(1)?,
        username: row.get(2)?,
        encrypted_secret: row.get(3)?,
        encrypted_notes: row.get(4)?,
        created_at,
    })
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<StoredRecord>>,
) -> Result<Vec<StoredRecord>> {
    rows.map(|r| r.map_err(PassLockError::from)).collect()
}

/// `<path><suffix>`, e.g. the `-journal` file SQLite keeps next to a database.
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PassLockError::StorageIo(StorageError::Filesystem(e))),
    }
}
