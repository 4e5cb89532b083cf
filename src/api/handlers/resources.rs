//! Resource-service endpoints behind the authentication middleware.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::Principal;
use crate::api::response::ApiError;
use crate::authz::Role;
use crate::ResourceState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiResponse {
    pub user_id: u64,
    pub session_id: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub purged: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn whoami(principal: Principal) -> Result<Json<WhoamiResponse>, ApiError> {
    principal.require(Role::Viewer)?;

    Ok(Json(WhoamiResponse {
        user_id: principal.user_id,
        session_id: principal.session_id,
        role: principal.role,
    }))
}

pub async fn purge_revocations(
    State(state): State<Arc<ResourceState>>,
    principal: Principal,
) -> Result<Json<PurgeResponse>, ApiError> {
    principal.require(Role::Admin)?;

    let purged = state
        .auth
        .store
        .purge_expired()
        .map_err(|e| ApiError::internal(format!("Failed to purge revocations: {e}")))?;

    tracing::info!(purged, user_id = principal.user_id, "Purged expired revocation records");
    Ok(Json(PurgeResponse { purged }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
