use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{AuthorityState, ResourceState};

use super::handlers;
use super::middleware::authenticate;

/// Router for the authority service: credential exchange and revocation
/// origination.
pub fn authority_router(state: Arc<AuthorityState>) -> Router {
    let auth = Arc::clone(&state.auth);

    Router::new()
        .route("/sessions/login", post(handlers::login))
        .route("/sessions/refresh", post(handlers::refresh))
        .route("/sessions/logout", post(handlers::logout))
        .route("/_internal/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(auth, authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the resource service: authenticated endpoints plus the
/// internal channel the authority service pushes into.
pub fn resource_router(state: Arc<ResourceState>) -> Router {
    let auth = Arc::clone(&state.auth);

    Router::new()
        .route("/whoami", get(handlers::whoami))
        .route("/admin/revocations", delete(handlers::purge_revocations))
        .route(
            "/_internal/invalidate-session",
            post(handlers::invalidate_session),
        )
        .route("/_internal/users", post(handlers::notify_user_created))
        .route("/_internal/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(auth, authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
