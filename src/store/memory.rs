//! In-process revocation tier.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use chrono::Utc;

use super::{RevocationStore, StoreError};

const SHARD_COUNT: usize = 16;

/// Sharded in-memory map of session id to revocation expiry (unix seconds).
///
/// Sharding keeps concurrent `is_revoked` lookups from serializing on a
/// single lock; each key touches exactly one shard.
pub struct MemoryRevocationStore {
    shards: Vec<RwLock<HashMap<String, i64>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT)
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
        }
    }

    fn shard(&self, session_id: &str) -> &RwLock<HashMap<String, i64>> {
        let mut hasher = DefaultHasher::new();
        session_id.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    /// Record a revocation with an absolute expiry instant.
    ///
    /// Used by the tiered store to backfill from the durable tier without
    /// re-deriving a TTL.
    pub(crate) fn insert_until(&self, session_id: &str, expires_at: i64) {
        let mut shard = self.shard(session_id).write().expect("shard lock poisoned");
        let entry = shard.entry(session_id.to_string()).or_insert(expires_at);
        *entry = (*entry).max(expires_at);
    }
}

impl Default for MemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        self.insert_until(session_id, Utc::now().timestamp() + ttl_seconds as i64);
        Ok(())
    }

    fn is_revoked(&self, session_id: &str) -> Result<bool, StoreError> {
        let shard = self.shard(session_id).read().expect("shard lock poisoned");
        // Expired entries are left in place for the purge task; treating
        // them as absent keeps the read path write-free.
        Ok(shard
            .get(session_id)
            .is_some_and(|expires_at| *expires_at > Utc::now().timestamp()))
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let now = Utc::now().timestamp();
        let mut removed = 0;
        for shard in &self.shards {
            let mut shard = shard.write().expect("shard lock poisoned");
            let before = shard.len();
            shard.retain(|_, expires_at| *expires_at > now);
            removed += before - shard.len();
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_lookup() {
        let store = MemoryRevocationStore::new();
        assert!(!store.is_revoked("s1").unwrap());

        store.revoke("s1", 3600).unwrap();
        assert!(store.is_revoked("s1").unwrap());
        assert!(!store.is_revoked("s2").unwrap());
    }

    #[test]
    fn test_expired_record_reads_as_absent() {
        let store = MemoryRevocationStore::new();
        store.insert_until("s1", Utc::now().timestamp() - 1);
        assert!(!store.is_revoked("s1").unwrap());
    }

    #[test]
    fn test_double_revoke_keeps_later_expiry() {
        let store = MemoryRevocationStore::new();
        let far = Utc::now().timestamp() + 10_000;
        store.insert_until("s1", far);
        store.insert_until("s1", Utc::now().timestamp() + 10);

        // A shorter re-revocation must not shrink the window.
        let shard = store.shard("s1").read().unwrap();
        assert_eq!(shard.get("s1"), Some(&far));
    }

    #[test]
    fn test_purge_expired() {
        let store = MemoryRevocationStore::new();
        store.revoke("live", 3600).unwrap();
        store.insert_until("dead-1", Utc::now().timestamp() - 5);
        store.insert_until("dead-2", Utc::now().timestamp() - 5);

        assert_eq!(store.purge_expired().unwrap(), 2);
        assert!(store.is_revoked("live").unwrap());
    }

    #[test]
    fn test_ttl_covers_refresh_lifetime() {
        let store = MemoryRevocationStore::new();
        let refresh_ttl = 86_400u64;
        store.revoke("s1", refresh_ttl).unwrap();

        // The record's expiry must not precede the refresh token's.
        let refresh_exp = Utc::now().timestamp() + refresh_ttl as i64;
        let shard = store.shard("s1").read().unwrap();
        assert!(*shard.get("s1").unwrap() >= refresh_exp);
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        use std::sync::Arc;

        let store = Arc::new(MemoryRevocationStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    let id = format!("s-{i}-{j}");
                    store.revoke(&id, 60).unwrap();
                    assert!(store.is_revoked(&id).unwrap());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
