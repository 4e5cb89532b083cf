//! Inter-service handlers on the resource side.
//!
//! These sit on the internal channel between the two services; the channel
//! relies on network-level trust, not bearer authentication.

use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson};
use crate::propagation::{
    InvalidateSessionRequest, InvalidateSessionResponse, NotifyUserCreatedRequest,
    NotifyUserCreatedResponse,
};
use crate::users::User;
use crate::ResourceState;

/// Apply a revocation pushed by the authority service.
pub async fn invalidate_session(
    State(state): State<Arc<ResourceState>>,
    AppJson(req): AppJson<InvalidateSessionRequest>,
) -> Result<Json<InvalidateSessionResponse>, ApiError> {
    if req.session_id.trim().is_empty() {
        return Err(ApiError::bad_request("sessionId is required"));
    }

    // The remote caller does not know which tokens are outstanding; the
    // refresh-token lifetime is the conservative upper bound.
    let ttl = state.config.tokens.revocation_ttl_seconds();
    state
        .auth
        .store
        .revoke(&req.session_id, ttl)
        .map_err(|e| ApiError::internal(format!("Failed to record revocation: {e}")))?;

    tracing::debug!(session_id = %req.session_id, "Applied remote revocation");
    Ok(Json(InvalidateSessionResponse { success: true }))
}

/// Register a user pushed by the authority service, so role resolution
/// works for tokens it later presents.
pub async fn notify_user_created(
    State(state): State<Arc<ResourceState>>,
    AppJson(req): AppJson<NotifyUserCreatedRequest>,
) -> Result<Json<NotifyUserCreatedResponse>, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }

    state.auth.users.upsert(
        User {
            id: req.id,
            username: req.username,
            role: req.role,
        },
        None,
    );

    tracing::debug!(user_id = req.id, "Registered user from authority service");
    Ok(Json(NotifyUserCreatedResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::resource_router;
    use crate::authz::Role;
    use crate::testutil::test_resource_state;

    fn json_post(path: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_invalidate_session_updates_store() {
        let (state, _issuer, _temp) = test_resource_state();
        let app = resource_router(Arc::clone(&state));

        let response = app
            .oneshot(json_post(
                "/_internal/invalidate-session",
                serde_json::json!({"sessionId": "remote-session"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: InvalidateSessionResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);

        assert!(state.auth.store.is_revoked("remote-session").unwrap());
    }

    #[tokio::test]
    async fn test_invalidate_session_rejects_blank_id() {
        let (state, _issuer, _temp) = test_resource_state();
        let response = resource_router(state)
            .oneshot(json_post(
                "/_internal/invalidate-session",
                serde_json::json!({"sessionId": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notify_user_created_registers_user() {
        let (state, _issuer, _temp) = test_resource_state();
        let response = resource_router(Arc::clone(&state))
            .oneshot(json_post(
                "/_internal/users",
                serde_json::json!({"id": 44, "username": "pushed", "role": "EDITOR"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let user = state.auth.users.find(44).unwrap();
        assert_eq!(user.username, "pushed");
        assert_eq!(user.role, Role::Editor);
    }
}
