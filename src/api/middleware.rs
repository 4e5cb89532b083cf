//! Bearer-token authentication middleware.
//!
//! Extracts the `Authorization: Bearer` credential, validates it as an
//! access token, resolves the caller's current role through the user
//! directory, and stashes a request-scoped [`Principal`] in the request
//! extensions. Requests without a credential pass through unauthenticated;
//! whether that is acceptable is the authorization layer's decision, made
//! where the handler extracts the principal.

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::authz::Role;
use crate::tokens::{TokenError, TokenType};
use crate::AuthContext;

use super::response::ApiError;

/// The authenticated caller of one request. Built per request, dropped with
/// it, never cached or shared.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: u64,
    pub session_id: String,
    pub role: Role,
}

impl Principal {
    /// Enforce the endpoint's required role.
    pub fn require(&self, required: Role) -> Result<(), ApiError> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "requires {required} role or above"
            )))
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

pub async fn authenticate(
    State(auth): State<Arc<AuthContext>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return next.run(request).await;
    };

    match auth.validator.validate(token, TokenType::Access) {
        Ok(claims) => {
            let Some(user) = auth.users.find(claims.user_id) else {
                // Valid token for a user that no longer exists. Same 401 as
                // every other rejection.
                tracing::debug!(user_id = claims.user_id, "Token subject not found");
                return ApiError::unauthorized().into_response();
            };

            let principal = Principal {
                user_id: claims.user_id,
                session_id: claims.session_id,
                role: user.role,
            };
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(TokenError::Store(e)) => {
            tracing::error!(error = %e, "Revocation lookup failed");
            ApiError::internal("revocation store unavailable").into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized().into_response()
        }
    }
}
