/// Injectable storage interface
///
/// All persistence goes through the [`Store`] trait so the backend is
/// an explicit startup-time choice instead of ambient module state.
/// Two implementations exist:
///
/// - [`PgStore`]: Postgres via sqlx (production)
/// - [`MemStore`]: in-process tables (no `DATABASE_URL`, and tests)
///
/// # Owner scoping
///
/// Every task operation takes the owner id and applies it inside the
/// query. A task id belonging to another user is indistinguishable
/// from a nonexistent one (both come back as `None`/`false`), so the
/// API cannot leak which ids exist.
///
/// # Errors
///
/// The trait surfaces exactly two failure kinds: a duplicate email on
/// signup, and the backend being unavailable. Not-found is part of
/// the return shape, not an error.

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::task::{Task, TaskFields};
use crate::models::user::{NewUser, User};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Email already registered (unique constraint)
    #[error("email is already registered")]
    DuplicateEmail,

    /// Backend unreachable or query failed
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Backend identity reported by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    /// "postgres" or "memory"
    pub backend: String,

    /// Database name, when the backend has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Server version string, when the backend has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Storage operations for users and tasks
#[async_trait]
pub trait Store: Send + Sync {
    /// Persists a new user; fails with [`StoreError::DuplicateEmail`]
    /// if the email is taken
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError>;

    /// Looks a user up by exact email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Looks a user up by id
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// All registered users, for the reminder scheduler
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Deletes a user; owned tasks cascade away
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// All tasks for an owner, ascending id (stable creation order)
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, StoreError>;

    /// Persists a new task with defaults applied
    async fn create_task(&self, owner_id: i64, fields: TaskFields) -> Result<Task, StoreError>;

    /// Full replace of all mutable fields; `None` when no task with
    /// that id exists for that owner
    async fn update_task(
        &self,
        owner_id: i64,
        id: i64,
        fields: TaskFields,
    ) -> Result<Option<Task>, StoreError>;

    /// Removes a task under the same scoping rule
    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool, StoreError>;

    /// Tasks for an owner due on `date` that are not done
    async fn tasks_due_on(&self, owner_id: i64, date: NaiveDate) -> Result<Vec<Task>, StoreError>;

    /// Verifies the backend responds and reports its identity
    async fn ping(&self) -> Result<StoreInfo, StoreError>;
}
