use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error body
// ============================================================================

/// The JSON body of every non-2xx response: `{status, message}`.
///
/// `status` is `"fail"` for client errors and `"error"` for server errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: ErrorStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatus {
    Error,
    Fail,
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// Error type for handler `Result` returns; renders the `{status, message}`
/// body with the right status code.
#[derive(Debug)]
pub enum ApiError {
    Fail(StatusCode, String),
    Error(StatusCode, String),
}

impl ApiError {
    /// Uniform 401. Parsing, signature, expiry, and revocation failures all
    /// collapse to this one message so the response leaks nothing about why
    /// a credential was rejected.
    pub fn unauthorized() -> Self {
        ApiError::Fail(
            StatusCode::UNAUTHORIZED,
            "authentication failed".to_string(),
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::FORBIDDEN, message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Fail(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Error(StatusCode::INTERNAL_SERVER_ERROR, message.into())
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (code, status, message) = match self {
            ApiError::Fail(code, message) => (code, ErrorStatus::Fail, message),
            ApiError::Error(code, message) => (code, ErrorStatus::Error, message),
        };
        (code, Json(ErrorBody { status, message })).into_response()
    }
}

// ============================================================================
// JSON extractor with ApiError rejections
// ============================================================================

/// `Json` wrapper whose rejection renders the standard error body instead
/// of axum's plain-text default.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
