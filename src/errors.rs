use thiserror::Error;

/// All errors that can occur in PassLock.
#[derive(Debug, Error)]
pub enum PassLockError {
    // --- Crypto errors ---
    #[error("System random source unavailable: {0}")]
    RandomSource(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Ciphertext failed authentication (wrong key or tampered data)")]
    AuthenticationFailure,

    #[error("Malformed ciphertext: {len} bytes is shorter than the nonce")]
    MalformedCiphertext { len: usize },

    // --- Vault errors ---
    #[error("Vault '{0}' already exists")]
    VaultAlreadyExists(String),

    #[error("Vault '{0}' not found")]
    VaultNotFound(String),

    #[error("Invalid vault name '{name}': {reason}")]
    InvalidVaultName { name: String, reason: String },

    #[error("Authentication denied")]
    AuthenticationDenied,

    // --- Record errors ---
    #[error("Record {0} not found")]
    RecordNotFound(i64),

    #[error("Record {0} could not be decrypted (corrupt data or wrong key)")]
    RecordCorruptOrWrongKey(i64),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    StorageIo(#[source] StorageError),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Underlying cause of a [`PassLockError::StorageIo`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("filesystem: {0}")]
    Filesystem(#[from] std::io::Error),
}

impl From<rusqlite::Error> for PassLockError {
    fn from(e: rusqlite::Error) -> Self {
        Self::StorageIo(StorageError::Database(e))
    }
}

impl From<std::io::Error> for PassLockError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageIo(StorageError::Filesystem(e))
    }
}

impl PassLockError {
    /// Message safe to show at a login prompt.
    ///
    /// A missing vault and a wrong password look the same to the user so
    /// the prompt cannot be used to probe which vaults exist.
    pub fn public_message(&self) -> String {
        match self {
            Self::VaultNotFound(_) | Self::AuthenticationDenied => {
                "Authentication failed".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience type alias for PassLock results.
pub type Result<T> = std::result::Result<T, PassLockError>;
