/// Health check endpoint
///
/// Verifies the server is up and the storage backend answers. When the
/// backend is Postgres, the response carries the database name and
/// server version; the in-memory store just reports its backend name.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "db": { "backend": "postgres", "database": "taskflow", "version": "PostgreSQL 16.1" }
/// }
/// ```
///
/// A failing store ping returns 503 instead.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskflow_shared::store::StoreInfo;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Storage backend identity
    pub db: StoreInfo,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let info = state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable("Storage backend is unavailable".to_string())
    })?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        db: info,
    }))
}
