/// REST client, update queue, and background persistence
///
/// The board keeps local state as the user-visible truth and persists
/// drops in the background. Two pieces make that safe:
///
/// - [`ApiClient`]: a thin reqwest wrapper over the REST surface.
/// - [`UpdateQueue`]: per-task sequence numbers. Every persist takes a
///   ticket when it starts; when the response lands, only the holder
///   of the latest ticket for that task may apply it. Responses from
///   superseded requests are discarded, so two quick drags of the same
///   card can never resolve out of order and resurrect stale fields.
///
/// Failed persists are logged and swallowed; the board is not rolled
/// back. The next full refresh reconciles with the server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use serde_json::json;

use taskflow_shared::models::task::{Task, TaskFields};
use taskflow_shared::models::user::PublicUser;

/// Error type for API calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("api error {status}: {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// An authenticated call was made before login
    #[error("not logged in")]
    NotAuthenticated,
}

/// Token plus user, as signup and login return it
#[derive(Debug, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Thin client over the TaskFlow REST surface
///
/// Holds the bearer token after a successful signup or login and
/// attaches it to every subsequent call.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Mutex<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Installs a token obtained elsewhere (e.g. a stored session)
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ClientError::NotAuthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&json!({"email": email, "password": password, "name": name}))
            .send()
            .await?;

        let session: Session = deserialize(response).await?;
        self.set_token(session.token.clone());
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;

        let session: Session = deserialize(response).await?;
        self.set_token(session.token.clone());
        Ok(session)
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        deserialize(response).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self
            .http
            .get(self.url("/tasks"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        deserialize(response).await
    }

    pub async fn create_task(&self, fields: &TaskFields) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .bearer_auth(self.bearer()?)
            .json(fields)
            .send()
            .await?;
        deserialize(response).await
    }

    pub async fn update_task(&self, id: i64, fields: &TaskFields) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{}", id)))
            .bearer_auth(self.bearer()?)
            .json(fields)
            .send()
            .await?;
        deserialize(response).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response).await);
        }
        Ok(())
    }
}

async fn deserialize<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(api_error(status.as_u16(), response).await);
    }
    Ok(response.json().await?)
}

async fn api_error(status: u16, response: reqwest::Response) -> ClientError {
    let message = response
        .json::<ApiErrorBody>()
        .await
        .map(|b| b.message)
        .unwrap_or_default();
    ClientError::Api { status, message }
}

/// Per-task sequence numbers for in-flight updates
///
/// `begin` hands out a ticket and marks it as the latest for that
/// task; `is_current` says whether a finishing request still holds the
/// latest ticket. Anything older has been superseded.
#[derive(Debug, Default)]
pub struct UpdateQueue {
    latest: HashMap<i64, u64>,
    counter: u64,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-flight update and returns its ticket
    pub fn begin(&mut self, task_id: i64) -> u64 {
        self.counter += 1;
        self.latest.insert(task_id, self.counter);
        self.counter
    }

    /// Whether `ticket` is still the latest update for `task_id`
    pub fn is_current(&self, task_id: i64, ticket: u64) -> bool {
        self.latest.get(&task_id) == Some(&ticket)
    }
}

/// What happened to one persist attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    /// Latest ticket; the server's echo may be applied
    Applied(Task),

    /// A newer update for the same task started mid-flight
    Superseded,

    /// The request failed; local state stays as-is
    Failed,
}

/// Bridges board drops to the API without blocking the UI
#[derive(Clone)]
pub struct BoardSync {
    client: Arc<ApiClient>,
    queue: Arc<Mutex<UpdateQueue>>,
}

impl BoardSync {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            queue: Arc::new(Mutex::new(UpdateQueue::new())),
        }
    }

    /// Persists a dropped task's full field set
    ///
    /// The local board already shows the post-drop state, so failure
    /// only gets a log line, and a response that lost the race to a
    /// newer update for the same task is discarded.
    pub async fn persist(&self, task: Task) -> PersistOutcome {
        let ticket = self.lock_queue().begin(task.id);

        let fields = TaskFields {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: Some(task.priority),
            due_date: task.due_date,
            status: Some(task.status),
            tags: Some(task.tags.clone()),
            attachments: Some(task.attachments),
        };

        let result = self.client.update_task(task.id, &fields).await;

        if !self.lock_queue().is_current(task.id, ticket) {
            tracing::debug!(task_id = task.id, ticket, "Discarding superseded update response");
            return PersistOutcome::Superseded;
        }

        match result {
            Ok(echo) => PersistOutcome::Applied(echo),
            Err(e) => {
                tracing::warn!(task_id = task.id, error = %e, "Failed to persist task update");
                PersistOutcome::Failed
            }
        }
    }

    /// Fire-and-forget variant for drop handlers
    pub fn persist_in_background(&self, task: Task) {
        let sync = self.clone();
        tokio::spawn(async move {
            sync.persist(task).await;
        });
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, UpdateQueue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}
