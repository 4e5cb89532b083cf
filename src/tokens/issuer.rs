//! Minting of access/refresh token pairs.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::TokenConfig;

use super::claims::{Claims, TokenType};
use super::codec::{TokenCodec, TokenError};
use super::generator::generate_hex;

/// The result of a login: a fresh session and both tokens bound to it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: String,
}

/// Mints signed tokens. Stateless beyond config and the shared codec.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, tokens: &TokenConfig) -> Self {
        Self {
            codec,
            access_ttl_seconds: tokens.access_ttl_seconds,
            refresh_ttl_seconds: tokens.refresh_ttl_seconds,
        }
    }

    /// Issue an access token bound to an existing session.
    ///
    /// The session id is required by signature: an access token without a
    /// session would be unrevocable.
    pub fn issue_access(&self, user_id: u64, session_id: &str) -> Result<String, TokenError> {
        let claims = self.build_claims(user_id, TokenType::Access, session_id.to_string());
        self.codec.sign(&claims)
    }

    /// Issue a refresh token, opening a new session when none is supplied.
    pub fn issue_refresh(
        &self,
        user_id: u64,
        session_id: Option<&str>,
    ) -> Result<String, TokenError> {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| generate_hex(16));
        let claims = self.build_claims(user_id, TokenType::Refresh, session_id);
        self.codec.sign(&claims)
    }

    /// Login flow: mint a refresh token with a fresh session id and an
    /// access token bound to the same session.
    pub fn issue_token_pair(&self, user_id: u64) -> Result<TokenPair, TokenError> {
        let session_id = generate_hex(16);
        let refresh_token = self.issue_refresh(user_id, Some(&session_id))?;
        let access_token = self.issue_access(user_id, &session_id)?;

        tracing::debug!(user_id, session_id = %session_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            session_id,
        })
    }

    /// Refresh flow: mint a new access token inside the refresh token's
    /// session. No new refresh token is minted; the session's outer
    /// lifetime stays fixed.
    pub fn refresh_access(&self, refresh: &Claims) -> Result<String, TokenError> {
        if refresh.token_type != TokenType::Refresh {
            return Err(TokenError::TokenTypeMismatch {
                expected: TokenType::Refresh,
                actual: refresh.token_type,
            });
        }

        let token = self.issue_access(refresh.user_id, &refresh.session_id)?;
        tracing::debug!(
            user_id = refresh.user_id,
            session_id = %refresh.session_id,
            "Refreshed access token"
        );
        Ok(token)
    }

    fn build_claims(&self, user_id: u64, token_type: TokenType, session_id: String) -> Claims {
        let now = Utc::now().timestamp();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_seconds,
            TokenType::Refresh => self.refresh_ttl_seconds,
        };

        Claims {
            user_id,
            token_type,
            session_id,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl as i64,
        }
    }
}
