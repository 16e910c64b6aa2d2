//! Vault module: per-vault encrypted record storage.
//!
//! This module provides:
//! - On-disk schema, metadata types, and name validation (`schema`)
//! - `StoredRecord` and decrypted `Entry` types (`record`)
//! - `VaultStore` / `VaultHandle` for SQLite persistence (`store`)
//! - `VaultManager` and `Session` for lifecycle and authentication (`manager`)
//! - `RecordService` for encrypted record CRUD (`records`)

pub mod manager;
pub mod record;
pub mod records;
pub mod schema;
pub mod store;

// Re-export the most commonly used items.
pub use manager::{Session, VaultManager};
pub use record::{Entry, StoredRecord};
pub use records::RecordService;
pub use schema::{validate_vault_name, StoredKdfParams, VaultMetadata};
pub use store::{VaultHandle, VaultStore};
