/// In-memory storage
///
/// Backs the server when no `DATABASE_URL` is configured and gives the
/// API tests a real [`Store`] without a database. Tables live behind a
/// single `RwLock`; ids are handed out from monotonic counters so
/// ascending-id ordering matches the Postgres behavior.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreInfo};
use crate::models::task::{Task, TaskFields, TaskStatus};
use crate::models::user::{NewUser, User};

#[derive(Debug, Clone)]
struct MemTask {
    owner_id: i64,
    task: Task,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, MemTask>,
    next_user_id: i64,
    next_task_id: i64,
}

/// In-memory implementation of [`Store`]
#[derive(Debug, Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, data: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::DuplicateEmail);
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let existed = tables.users.remove(&id).is_some();
        if existed {
            // Cascade, same as the FK
            tables.tasks.retain(|_, t| t.owner_id != id);
        }
        Ok(existed)
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        // BTreeMap iteration is id-ascending already
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .map(|t| t.task.clone())
            .collect())
    }

    async fn create_task(&self, owner_id: i64, fields: TaskFields) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            priority: fields.priority_or_default(),
            due_date: fields.due_date,
            status: fields.status_or_default(),
            tags: fields.tags_or_default(),
            attachments: fields.attachments_or_default(),
        };
        tables.tasks.insert(task.id, MemTask { owner_id, task: task.clone() });
        Ok(task)
    }

    async fn update_task(
        &self,
        owner_id: i64,
        id: i64,
        fields: TaskFields,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(entry) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if entry.owner_id != owner_id {
            // Cross-owner ids look exactly like missing ones
            return Ok(None);
        }

        entry.task = Task {
            id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            priority: fields.priority_or_default(),
            due_date: fields.due_date,
            status: fields.status_or_default(),
            tags: fields.tags_or_default(),
            attachments: fields.attachments_or_default(),
        };
        Ok(Some(entry.task.clone()))
    }

    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.tasks.get(&id) {
            Some(entry) if entry.owner_id == owner_id => {
                tables.tasks.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn tasks_due_on(&self, owner_id: i64, date: NaiveDate) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| {
                t.owner_id == owner_id
                    && t.task.due_date == Some(date)
                    && t.task.status != TaskStatus::Done
            })
            .map(|t| t.task.clone())
            .collect())
    }

    async fn ping(&self) -> Result<StoreInfo, StoreError> {
        Ok(StoreInfo {
            backend: "memory".to_string(),
            database: None,
            version: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskPriority;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$hash".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let result = store.create_user(new_user("a@example.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let store = MemStore::new();
        let a = store.create_user(new_user("a@example.com")).await.unwrap();
        let b = store.create_user(new_user("b@example.com")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_create_task_applies_defaults() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let task = store
            .create_task(
                user.id,
                TaskFields {
                    title: "Pay rent".to_string(),
                    due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.tags, Vec::<String>::new());
        assert_eq!(task.attachments, 0);

        let listed = store.list_tasks(user.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], task);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let store = MemStore::new();
        let a = store.create_user(new_user("a@example.com")).await.unwrap();
        let b = store.create_user(new_user("b@example.com")).await.unwrap();

        let task = store
            .create_task(
                a.id,
                TaskFields {
                    title: "secret".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // B cannot see, update, or delete A's task
        assert!(store.list_tasks(b.id).await.unwrap().is_empty());
        assert!(store
            .update_task(
                b.id,
                task.id,
                TaskFields {
                    title: "stolen".to_string(),
                    ..Default::default()
                }
            )
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_task(b.id, task.id).await.unwrap());

        // A still owns the original
        let listed = store.list_tasks(a.id).await.unwrap();
        assert_eq!(listed[0].title, "secret");
    }

    #[tokio::test]
    async fn test_update_is_full_replace() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        let task = store
            .create_task(
                user.id,
                TaskFields {
                    title: "before".to_string(),
                    tags: Some(vec!["keep?".to_string()]),
                    attachments: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_task(
                user.id,
                task.id,
                TaskFields {
                    title: "after".to_string(),
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.status, TaskStatus::Done);
        // Fields not resent fall back to their defaults
        assert_eq!(updated.tags, Vec::<String>::new());
        assert_eq!(updated.attachments, 0);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        store
            .create_task(
                user.id,
                TaskFields {
                    title: "t".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        assert!(store.list_tasks(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_due_on_skips_done() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        for (title, status) in [
            ("due", None),
            ("finished", Some(TaskStatus::Done)),
            ("later", None),
        ] {
            store
                .create_task(
                    user.id,
                    TaskFields {
                        title: title.to_string(),
                        due_date: if title == "later" {
                            NaiveDate::from_ymd_opt(2024, 3, 2)
                        } else {
                            Some(date)
                        },
                        status,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let due = store.tasks_due_on(user.id, date).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "due");
    }
}
