//! Two-tier revocation store: memory front, redb authoritative.

use super::{MemoryRevocationStore, RedbRevocationStore, RevocationStore, StoreError};

/// Combines the in-process tier with the durable tier.
///
/// Writes land in the durable tier first; a revocation that reached only
/// memory would vanish on restart. Reads hit memory first and fall through
/// to redb on a miss, backfilling the memory tier so repeated lookups for
/// the same session stay off the disk path.
pub struct TieredRevocationStore {
    memory: MemoryRevocationStore,
    durable: RedbRevocationStore,
}

impl TieredRevocationStore {
    pub fn new(durable: RedbRevocationStore) -> Self {
        Self {
            memory: MemoryRevocationStore::new(),
            durable,
        }
    }
}

impl RevocationStore for TieredRevocationStore {
    fn revoke(&self, session_id: &str, ttl_seconds: u64) -> Result<(), StoreError> {
        self.durable.revoke(session_id, ttl_seconds)?;
        self.memory.revoke(session_id, ttl_seconds)?;
        Ok(())
    }

    fn is_revoked(&self, session_id: &str) -> Result<bool, StoreError> {
        if self.memory.is_revoked(session_id)? {
            return Ok(true);
        }

        match self.durable.expires_at(session_id)? {
            Some(expires_at) if expires_at > chrono::Utc::now().timestamp() => {
                self.memory.insert_until(session_id, expires_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        self.memory.purge_expired()?;
        // Report the durable count; the memory tier only mirrors it.
        self.durable.purge_expired()
    }
}
