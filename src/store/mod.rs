//! Session revocation storage.
//!
//! A revocation record maps a session id to an expiry instant. Presence of
//! an unexpired record means the session is revoked; records lapse on their
//! own once every token bound to the session would have expired naturally.
//! Callers must revoke with a TTL at least the refresh-token lifetime so
//! revocation can never lose the race against natural expiry.

mod memory;
mod redb;
mod tiered;

use thiserror::Error;

pub use memory::MemoryRevocationStore;
pub use redb::RedbRevocationStore;
pub use tiered::TieredRevocationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Commit error: {0}")]
    Commit(#[from] ::redb::CommitError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    RedbDatabase(#[from] ::redb::DatabaseError),
    #[error("Storage error: {0}")]
    Storage(#[from] ::redb::StorageError),
    #[error("Table error: {0}")]
    Table(#[from] ::redb::TableError),
    #[error("Transaction error: {0}")]
    Transaction(#[from] ::redb::TransactionError),
}

/// A key/TTL store of revoked sessions, shared by every request handler.
///
/// `is_revoked` must be a point lookup safe under concurrent `revoke` calls;
/// implementations must not take a global lock on the read path.
pub trait RevocationStore: Send + Sync {
    /// Record a session as revoked for `ttl_seconds` from now.
    ///
    /// Idempotent; revoking an already-revoked session keeps the later
    /// expiry of the two records.
    fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), StoreError>;

    /// Whether an unexpired revocation record exists for this session.
    fn is_revoked(&self, session_id: &str) -> Result<bool, StoreError>;

    /// Drop expired records, returning how many were removed.
    fn purge_expired(&self) -> Result<usize, StoreError>;
}
