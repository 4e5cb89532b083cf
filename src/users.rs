//! The user-lookup collaborator.
//!
//! Real deployments back this with whatever stores the user accounts; the
//! token protocol only needs credential verification at login and a
//! role lookup per authenticated request, so that seam is a trait.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::authz::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

pub trait UserDirectory: Send + Sync {
    /// Resolve credentials to a user. Unknown username and wrong password
    /// are indistinguishable to the caller.
    fn verify_credentials(&self, username: &str, password: &str) -> Option<User>;

    /// Look up a user by id (role resolution per authenticated request).
    fn find(&self, user_id: u64) -> Option<User>;

    /// Insert or replace a user. `password` is `None` for directories that
    /// only resolve roles (the resource service never sees passwords).
    fn upsert(&self, user: User, password: Option<&str>);
}

struct StoredUser {
    user: User,
    password_digest: Option<String>,
}

/// In-memory directory, seeded at startup and extended over the
/// user-created notification channel.
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<u64, StoredUser>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Directory containing a single seeded admin with id 1.
    pub fn with_admin(username: &str, password: &str) -> Self {
        let directory = Self::new();
        directory.upsert(
            User {
                id: 1,
                username: username.to_string(),
                role: Role::Admin,
            },
            Some(password),
        );
        directory
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn verify_credentials(&self, username: &str, password: &str) -> Option<User> {
        let users = self.users.read().expect("user directory lock poisoned");
        let stored = users
            .values()
            .find(|stored| stored.user.username == username)?;

        let digest = stored.password_digest.as_deref()?;
        if digest == password_digest(password) {
            Some(stored.user.clone())
        } else {
            None
        }
    }

    fn find(&self, user_id: u64) -> Option<User> {
        let users = self.users.read().expect("user directory lock poisoned");
        users.get(&user_id).map(|stored| stored.user.clone())
    }

    fn upsert(&self, user: User, password: Option<&str>) {
        let mut users = self.users.write().expect("user directory lock poisoned");
        let password_digest = password.map(password_digest);
        users.insert(
            user.id,
            StoredUser {
                user,
                password_digest,
            },
        );
    }
}

fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> MemoryUserDirectory {
        let directory = MemoryUserDirectory::new();
        directory.upsert(
            User {
                id: 10,
                username: "martin".to_string(),
                role: Role::Editor,
            },
            Some("hunter2"),
        );
        directory
    }

    #[test]
    fn test_verify_credentials() {
        let directory = directory();
        let user = directory.verify_credentials("martin", "hunter2").unwrap();
        assert_eq!(user.id, 10);
        assert_eq!(user.role, Role::Editor);
    }

    #[test]
    fn test_bad_credentials_are_uniform() {
        let directory = directory();
        // Wrong password and unknown user look identical to the caller.
        assert!(directory.verify_credentials("martin", "wrong").is_none());
        assert!(directory.verify_credentials("nobody", "hunter2").is_none());
    }

    #[test]
    fn test_passwordless_user_cannot_log_in() {
        let directory = MemoryUserDirectory::new();
        directory.upsert(
            User {
                id: 2,
                username: "role-only".to_string(),
                role: Role::Viewer,
            },
            None,
        );

        assert!(directory.verify_credentials("role-only", "").is_none());
        assert!(directory.find(2).is_some());
    }

    #[test]
    fn test_upsert_replaces() {
        let directory = directory();
        directory.upsert(
            User {
                id: 10,
                username: "martin".to_string(),
                role: Role::Admin,
            },
            Some("hunter2"),
        );
        assert_eq!(directory.find(10).unwrap().role, Role::Admin);
    }
}
