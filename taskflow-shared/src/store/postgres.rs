/// Postgres-backed storage
///
/// Queries go through the shared [`PgPool`]; task rows come back as
/// [`RawTask`] and are normalized with [`Task::format`] so the JSONB
/// `tags`/`attachments` columns can never leak a malformed shape.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;

use super::{Store, StoreError, StoreInfo};
use crate::models::task::{RawTask, Task, TaskFields, TaskStatus};
use crate::models::user::{NewUser, User};

const TASK_COLUMNS: &str =
    "id, user_id, title, description, priority, due_date, status, tags, attachments, created_at";

/// Postgres implementation of [`Store`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, shared with the reminder scheduler
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains("email") {
                return StoreError::DuplicateEmail;
            }
        }
    }
    StoreError::Unavailable(e.to_string())
}

fn tags_json(fields: &TaskFields) -> JsonValue {
    json!(fields.tags_or_default())
}

fn attachments_json(fields: &TaskFields) -> JsonValue {
    json!(fields.attachments_or_default())
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, RawTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Task::format).collect())
    }

    async fn create_task(&self, owner_id: i64, fields: TaskFields) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, RawTask>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, due_date, status, tags, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.priority_or_default())
        .bind(fields.due_date)
        .bind(fields.status_or_default())
        .bind(tags_json(&fields))
        .bind(attachments_json(&fields))
        .fetch_one(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(Task::format(row))
    }

    async fn update_task(
        &self,
        owner_id: i64,
        id: i64,
        fields: TaskFields,
    ) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query_as::<_, RawTask>(&format!(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, priority = $3, due_date = $4,
                status = $5, tags = $6, attachments = $7
            WHERE id = $8 AND user_id = $9
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.priority_or_default())
        .bind(fields.due_date)
        .bind(fields.status_or_default())
        .bind(tags_json(&fields))
        .bind(attachments_json(&fields))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Task::format))
    }

    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn tasks_due_on(&self, owner_id: i64, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, RawTask>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE user_id = $1 AND due_date = $2 AND status != $3
            ORDER BY id
            "#
        ))
        .bind(owner_id)
        .bind(date)
        .bind(TaskStatus::Done)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(rows.into_iter().map(Task::format).collect())
    }

    async fn ping(&self) -> Result<StoreInfo, StoreError> {
        let (database, version): (String, String) =
            sqlx::query_as("SELECT current_database(), version()")
                .fetch_one(&self.pool)
                .await
                .map_err(map_err)?;

        Ok(StoreInfo {
            backend: "postgres".to_string(),
            database: Some(database),
            version: Some(version),
        })
    }
}
