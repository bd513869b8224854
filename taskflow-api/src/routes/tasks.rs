/// Task CRUD endpoints
///
/// All routes here sit behind the bearer middleware and are scoped to
/// the authenticated owner. A task id belonging to someone else is
/// answered exactly like a nonexistent one (404), so the API never
/// reveals which ids exist.
///
/// # Endpoints
///
/// - `GET /tasks` - List the owner's tasks, ascending id
/// - `POST /tasks` - Create a task (defaults: todo, medium, [], 0)
/// - `PUT /tasks/:id` - Full replace of all mutable fields
/// - `DELETE /tasks/:id` - Remove a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use taskflow_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskFields},
};

/// List all tasks for the authenticated user
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks(auth.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// Title is required and must be non-empty after trimming; every other
/// field falls back to its documented default.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(fields) = body?;
    validate_title(&fields)?;

    let task = state.store.create_task(auth.user_id, fields).await?;

    tracing::debug!(user_id = auth.user_id, task_id = task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Full-replace update of a task
///
/// The request body carries the complete field set; omitted fields
/// revert to their defaults rather than being preserved. 404 when the
/// id does not exist for this owner.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(fields) = body?;
    validate_title(&fields)?;

    let task = state
        .store
        .update_task(auth.user_id, id, fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = state.store.delete_task(auth.user_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(fields: &TaskFields) -> Result<(), ApiError> {
    if fields.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    Ok(())
}
