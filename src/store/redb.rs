//! Durable revocation tier backed by an embedded redb database.
//!
//! Revocations must outlive a process restart: an access token stays valid
//! for its full lifetime, so a restart that forgot revocations would
//! resurrect logged-out sessions.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use super::{RevocationStore, StoreError};

/// Revocation records: session_id -> expiry (unix seconds)
const REVOCATIONS: TableDefinition<&str, i64> = TableDefinition::new("revocations");

pub struct RedbRevocationStore {
    db: Database,
}

impl RedbRevocationStore {
    /// Open or create the store under the given data directory.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("tokengate.redb");
        let db = Database::create(db_path)?;

        // Create the table if it doesn't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(REVOCATIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// The stored expiry instant for a session, if any record exists
    /// (expired or not). Lets the tiered store backfill its memory tier
    /// with the exact remaining window.
    pub(crate) fn expires_at(&self, session_id: &str) -> Result<Option<i64>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(REVOCATIONS)?;
        Ok(table.get(session_id)?.map(|v| v.value()))
    }
}

impl RevocationStore for RedbRevocationStore {
    fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        let expires_at = Utc::now().timestamp() + ttl_seconds as i64;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(REVOCATIONS)?;
            let existing = table.get(session_id)?.map(|v| v.value());
            // Keep the later expiry on double revoke.
            if existing.map_or(true, |e| e < expires_at) {
                table.insert(session_id, expires_at)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn is_revoked(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .expires_at(session_id)?
            .is_some_and(|expires_at| expires_at > Utc::now().timestamp()))
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = Utc::now().timestamp();

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(REVOCATIONS)?;
            let expired: Vec<String> = table
                .iter()?
                .filter_map(|entry| entry.ok())
                .filter(|(_, expires_at)| expires_at.value() <= now)
                .map(|(session_id, _)| session_id.value().to_string())
                .collect();

            for session_id in &expired {
                table.remove(session_id.as_str())?;
            }
            expired.len()
        };
        write_txn.commit()?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (RedbRevocationStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RedbRevocationStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_revoke_and_lookup() {
        let (store, _temp) = setup();

        assert!(!store.is_revoked("s1").unwrap());
        store.revoke("s1", 3600).unwrap();
        assert!(store.is_revoked("s1").unwrap());
        assert!(!store.is_revoked("other").unwrap());
    }

    #[test]
    fn test_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = RedbRevocationStore::open(temp_dir.path()).unwrap();
            store.revoke("s1", 3600).unwrap();
        }

        let store = RedbRevocationStore::open(temp_dir.path()).unwrap();
        assert!(store.is_revoked("s1").unwrap());
    }

    #[test]
    fn test_double_revoke_keeps_later_expiry() {
        let (store, _temp) = setup();

        store.revoke("s1", 10_000).unwrap();
        let first = store.expires_at("s1").unwrap().unwrap();

        store.revoke("s1", 10).unwrap();
        assert_eq!(store.expires_at("s1").unwrap().unwrap(), first);
    }

    #[test]
    fn test_purge_expired() {
        let (store, _temp) = setup();

        store.revoke("live", 3600).unwrap();
        // Write an already-expired record directly.
        let write_txn = store.db.begin_write().unwrap();
        {
            let mut table = write_txn.open_table(REVOCATIONS).unwrap();
            table
                .insert("dead", Utc::now().timestamp() - 10)
                .unwrap();
        }
        write_txn.commit().unwrap();

        assert!(!store.is_revoked("dead").unwrap());
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert!(store.is_revoked("live").unwrap());
        assert_eq!(store.expires_at("dead").unwrap(), None);
    }
}
