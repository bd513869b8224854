/// End-to-end board flow against a live API server
///
/// Spins the real router up on an ephemeral port over the in-memory
/// store, then drives it with the board client: signup, create, drag
/// across columns, persist, refresh.

use std::sync::Arc;

use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::{ApiConfig, Config, JwtConfig};
use taskflow_board::state::{BoardState, DropTarget};
use taskflow_board::sync::{ApiClient, BoardSync, ClientError, PersistOutcome};
use taskflow_shared::models::task::{TaskFields, TaskStatus};
use taskflow_shared::store::MemStore;

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: None,
        jwt: JwtConfig {
            secret: "board-flow-test-secret-0123456789abcdef".to_string(),
        },
        smtp: None,
        reminder_hour: 8,
    }
}

async fn spawn_server() -> String {
    let state = AppState::new(Arc::new(MemStore::new()), test_config());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn fields(title: &str) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_signup_create_drag_persist_refresh() {
    let base = spawn_server().await;
    let client = Arc::new(ApiClient::new(base));

    let session = client
        .signup("carol@example.com", "hunter22", Some("Carol"))
        .await
        .unwrap();
    assert_eq!(session.user.email, "carol@example.com");

    client.create_task(&fields("Pay rent")).await.unwrap();
    client.create_task(&fields("Buy groceries")).await.unwrap();

    let mut board = BoardState::new();
    board.set_tasks(client.list_tasks().await.unwrap());
    assert_eq!(board.column(TaskStatus::Todo).len(), 2);

    // Drag "Pay rent" into in-progress
    let rent_id = board.column(TaskStatus::Todo)[0].id;
    board.drag_start(rent_id);
    board.drag_over(DropTarget::Column(TaskStatus::InProgress));
    let dropped = board
        .drag_end(DropTarget::Column(TaskStatus::InProgress))
        .unwrap();

    let sync = BoardSync::new(client.clone());
    let outcome = sync.persist(dropped).await;
    assert!(matches!(outcome, PersistOutcome::Applied(_)));

    // A fresh fetch shows the move stuck server-side
    board.set_tasks(client.list_tasks().await.unwrap());
    assert_eq!(board.task(rent_id).unwrap().status, TaskStatus::InProgress);
    assert_eq!(board.column(TaskStatus::Todo).len(), 1);
}

#[tokio::test]
async fn test_login_and_me() {
    let base = spawn_server().await;
    let client = ApiClient::new(base.clone());
    client.signup("dave@example.com", "hunter22", None).await.unwrap();

    // A second client logs in from scratch
    let client = ApiClient::new(base);
    assert!(matches!(client.me().await, Err(ClientError::NotAuthenticated)));

    let session = client.login("dave@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user.email, "dave@example.com");

    let me = client.me().await.unwrap();
    assert_eq!(me.id, session.user.id);
}

#[tokio::test]
async fn test_api_errors_surface_status() {
    let base = spawn_server().await;
    let client = ApiClient::new(base);
    client.signup("erin@example.com", "hunter22", None).await.unwrap();

    let err = client.update_task(999, &fields("ghost")).await.unwrap_err();
    match err {
        ClientError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_persist_leaves_local_state() {
    let base = spawn_server().await;
    let client = Arc::new(ApiClient::new(base));
    client.signup("frank@example.com", "hunter22", None).await.unwrap();

    let task = client.create_task(&fields("Doomed")).await.unwrap();
    client.delete_task(task.id).await.unwrap();

    let mut board = BoardState::new();
    board.set_tasks(vec![task.clone()]);
    board.drag_start(task.id);
    let dropped = board.drag_end(DropTarget::Column(TaskStatus::Done)).unwrap();

    let sync = BoardSync::new(client);
    let outcome = sync.persist(dropped).await;
    assert_eq!(outcome, PersistOutcome::Failed);

    // The board is not rolled back; refresh reconciles later
    assert_eq!(board.task(task.id).unwrap().status, TaskStatus::Done);
}
