//! Authority-service session endpoints: login, refresh, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::Principal;
use crate::api::response::{ApiError, AppJson};
use crate::tokens::{TokenError, TokenType};
use crate::AuthorityState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn login(
    State(state): State<Arc<AuthorityState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    // Unknown user and wrong password produce the same response; the
    // distinction would enable account enumeration.
    let Some(user) = state.auth.users.verify_credentials(&req.username, &req.password) else {
        tracing::debug!(username = %req.username, "Login rejected");
        return Err(ApiError::unauthorized());
    };

    let pair = state
        .issuer
        .issue_token_pair(user.id)
        .map_err(|e| ApiError::internal(format!("Failed to issue tokens: {e}")))?;

    tracing::debug!(user_id = user.id, session_id = %pair.session_id, "Login succeeded");

    Ok(Json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in_seconds: state.config.tokens.access_ttl_seconds,
    }))
}

pub async fn refresh(
    State(state): State<Arc<AuthorityState>>,
    AppJson(req): AppJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if req.refresh_token.trim().is_empty() {
        return Err(ApiError::bad_request("refreshToken is required"));
    }

    // A locally revoked session rejects refreshes immediately, whether or
    // not the resource service has heard about the revocation yet.
    let claims = match state
        .auth
        .validator
        .validate(&req.refresh_token, TokenType::Refresh)
    {
        Ok(claims) => claims,
        Err(TokenError::Store(e)) => {
            tracing::error!(error = %e, "Revocation lookup failed during refresh");
            return Err(ApiError::internal("revocation store unavailable"));
        }
        Err(e) => {
            tracing::debug!(error = %e, "Refresh rejected");
            return Err(ApiError::unauthorized());
        }
    };

    let access_token = state
        .issuer
        .refresh_access(&claims)
        .map_err(|e| ApiError::internal(format!("Failed to issue access token: {e}")))?;

    // The session survives the refresh: the original refresh token is
    // returned unchanged, no new one is minted.
    Ok(Json(TokenResponse {
        access_token,
        refresh_token: req.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in_seconds: state.config.tokens.access_ttl_seconds,
    }))
}

pub async fn logout(
    State(state): State<Arc<AuthorityState>>,
    principal: Principal,
) -> Result<StatusCode, ApiError> {
    let ttl = state.config.tokens.revocation_ttl_seconds();
    state
        .auth
        .store
        .revoke(&principal.session_id, ttl)
        .map_err(|e| ApiError::internal(format!("Failed to record revocation: {e}")))?;

    // Local revocation is the commit point; propagation is best effort and
    // its failure never reaches this caller.
    if let Some(propagator) = &state.propagator {
        propagator.spawn_invalidate(principal.session_id.clone());
    }

    tracing::debug!(
        session_id = %principal.session_id,
        user_id = principal.user_id,
        "Session revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}
