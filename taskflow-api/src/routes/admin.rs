/// Administrative endpoints
///
/// # Endpoints
///
/// - `POST /admin/send-reminders` - Run today's digest pass immediately
///   instead of waiting for the scheduled hour. Requires a valid bearer
///   token; 503 when mail is not configured.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Outcome of a manual digest run
#[derive(Debug, Serialize, Deserialize)]
pub struct SendRemindersResponse {
    /// Date the digest covered (`YYYY-MM-DD`)
    pub date: String,

    /// Users who received a digest
    pub sent: usize,

    /// Users skipped because a query or send failed
    pub failed: usize,
}

/// Manual digest trigger
pub async fn send_reminders(
    State(state): State<AppState>,
) -> ApiResult<Json<SendRemindersResponse>> {
    let scheduler = state.scheduler.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Email delivery is not configured".to_string())
    })?;

    let today = Local::now().date_naive();
    let summary = scheduler.run_once(today).await;

    tracing::info!(
        date = %today,
        sent = summary.sent,
        failed = summary.failed,
        "Manual digest run finished"
    );

    Ok(Json(SendRemindersResponse {
        date: today.to_string(),
        sent: summary.sent,
        failed: summary.failed,
    }))
}
