use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The two token kinds the system issues.
///
/// The discriminator is embedded in the signed claims, so a refresh token
/// replayed where an access token is expected fails verification instead of
/// being silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Signed token payload.
///
/// `session_id` is the unit of revocation: every access token minted from a
/// refresh token carries that refresh token's `session_id` unchanged, so
/// revoking the session invalidates the whole family at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: u64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub session_id: String,
    /// Unique per token. Not used for replay detection.
    pub jti: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}
