/// Bearer-header parsing and the per-request auth context
///
/// The API layers a middleware over every `/tasks` route that parses
/// the `Authorization: Bearer <token>` header, validates the token,
/// and inserts an [`AuthContext`] into request extensions. Handlers
/// extract it with Axum's `Extension` extractor:
///
/// ```
/// use axum::Extension;
/// use taskflow_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("tasks scoped to user {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Identity attached to a request after successful authentication
///
/// Every task operation is scoped to `user_id`; no handler may touch
/// another user's rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i64,

    /// Email embedded in the token
    pub email: String,
}

impl AuthContext {
    /// Builds the context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
        }
    }
}

/// Error type for credential extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("access token required")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("expected bearer token")]
    InvalidFormat,
}

/// Pulls the bearer token out of the request headers
///
/// Distinguishes a missing header (401 at the API layer) from a
/// malformed one (403, like any other unverifiable credential).
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    value.strip_prefix("Bearer ").ok_or(AuthError::InvalidFormat)
}
