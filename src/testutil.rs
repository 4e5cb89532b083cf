//! Shared test helpers, available to all `#[cfg(test)]` modules in the crate.

use std::sync::Arc;

use tempfile::TempDir;

use crate::authz::Role;
use crate::config::{Config, NodeConfig, PropagationConfig, SeedConfig, TokenConfig};
use crate::store::{RedbRevocationStore, RevocationStore, TieredRevocationStore};
use crate::tokens::{TokenCodec, TokenIssuer, TokenValidator};
use crate::users::{MemoryUserDirectory, User, UserDirectory};
use crate::{AuthContext, AuthorityState, ResourceState};

pub fn test_token_config() -> TokenConfig {
    TokenConfig {
        access_secret: "access-secret-for-tests".to_string(),
        refresh_secret: "refresh-secret-for-tests".to_string(),
        access_ttl_seconds: 900,
        refresh_ttl_seconds: 86_400,
        cleanup_interval_seconds: 60,
    }
}

pub fn test_config() -> Config {
    Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: "/tmp/tokengate-test".to_string(),
        },
        tokens: test_token_config(),
        propagation: PropagationConfig::default(),
        seed: SeedConfig {
            admin_username: None,
            admin_password: None,
        },
    }
}

pub fn test_codec() -> Arc<TokenCodec> {
    let tokens = test_token_config();
    Arc::new(TokenCodec::new(tokens.access_secret, tokens.refresh_secret))
}

/// Build an [`AuthContext`] over a fresh tiered store and empty directory.
///
/// Returns the issuer sharing the same codec, and the `TempDir` guard the
/// caller must keep alive.
pub fn test_auth_context() -> (Arc<AuthContext>, TokenIssuer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let durable = RedbRevocationStore::open(temp_dir.path()).unwrap();
    let store: Arc<dyn RevocationStore> = Arc::new(TieredRevocationStore::new(durable));

    let codec = test_codec();
    let issuer = TokenIssuer::new(Arc::clone(&codec), &test_token_config());
    let validator = TokenValidator::new(codec, Arc::clone(&store));
    let users: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::new());

    let auth = Arc::new(AuthContext {
        validator,
        store,
        users,
    });
    (auth, issuer, temp_dir)
}

/// Full authority state with user 1 (`root` / `root-password`) seeded as
/// admin and propagation disabled.
pub fn test_authority_state() -> (Arc<AuthorityState>, TempDir) {
    let (auth, issuer, temp_dir) = test_auth_context();
    auth.users.upsert(
        User {
            id: 1,
            username: "root".to_string(),
            role: Role::Admin,
        },
        Some("root-password"),
    );

    let state = Arc::new(AuthorityState {
        auth,
        config: test_config(),
        issuer,
        propagator: None,
    });
    (state, temp_dir)
}

/// Full resource state with an empty user directory.
pub fn test_resource_state() -> (Arc<ResourceState>, TokenIssuer, TempDir) {
    let (auth, issuer, temp_dir) = test_auth_context();
    let state = Arc::new(ResourceState {
        auth,
        config: test_config(),
    });
    (state, issuer, temp_dir)
}
