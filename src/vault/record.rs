//! Record types: the encrypted row as stored, and the decrypted view.

use chrono::{DateTime, NaiveDateTime, Utc};
use zeroize::Zeroizing;

/// SQLite `CURRENT_TIMESTAMP` format (always UTC).
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A record exactly as persisted.  Secret and notes are opaque ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub service: String,
    pub username: String,
    /// Nonce + ciphertext + tag.
    pub encrypted_secret: Vec<u8>,
    /// Same scheme as the secret; `None` when the record has no notes.
    pub encrypted_notes: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

/// A decrypted record, returned by `RecordService`.
///
/// Plaintext fields are wiped from memory on drop and never printed
/// by `Debug`.
pub struct Entry {
    pub id: i64,
    pub service: String,
    pub username: String,
    pub secret: Zeroizing<String>,
    pub notes: Option<Zeroizing<String>>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("username", &self.username)
            .field("secret", &"***")
            .field("notes", &self.notes.as_ref().map(|_| "***"))
            .field("created_at", &self.created_at)
            .finish()
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT).map(|dt| dt.and_utc())
}
