/// Error handling for the API server
///
/// One unified error type that maps onto HTTP responses. Handlers
/// return `ApiResult<T>`; conversions from the shared error types keep
/// the handlers free of status-code bookkeeping.
///
/// # Taxonomy
///
/// - `BadRequest` (400): missing or empty required fields, bodies
///   that fail to parse
/// - `Unauthorized` (401): missing token, bad credentials
/// - `Forbidden` (403): invalid, expired, or malformed token
/// - `NotFound` (404): task absent or not owned (indistinguishable)
/// - `Conflict` (409): duplicate email on signup
/// - `Internal` (500): storage or crypto failure; detail is logged
///   server-side and never sent to the client
/// - `ServiceUnavailable` (503): health check failed / feature not
///   configured

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskflow_shared::auth::jwt::JwtError;
use taskflow_shared::auth::middleware::AuthError;
use taskflow_shared::auth::password::PasswordError;
use taskflow_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409)
    Conflict(String),

    /// Internal server error (500)
    Internal(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                ApiError::Conflict("Email is already registered".to_string())
            }
            StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

/// Missing header is 401; a header that carries something other than
/// a bearer token is a presented-but-unverifiable credential, 403
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Access token required".to_string())
            }
            AuthError::InvalidFormat => ApiError::Forbidden("Expected Bearer token".to_string()),
        }
    }
}

/// A token that fails validation is 403, not 401: the caller presented
/// credentials, they just don't check out
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired | JwtError::Invalid(_) => {
                ApiError::Forbidden("Invalid or expired token".to_string())
            }
            JwtError::CreateError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// A body that fails to parse (missing field, bad enum value, no JSON
/// at all) is a client mistake, not a routing artifact: 400, never 422
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
