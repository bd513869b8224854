/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory store so the whole HTTP
/// surface is exercised without Postgres. Helpers cover account setup
/// and request/response plumbing.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

use taskflow_api::app::{build_router, AppState};
use taskflow_api::config::{ApiConfig, Config, JwtConfig};
use taskflow_shared::store::MemStore;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context: the router plus direct store access
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemStore>,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemStore::new());
        let state = AppState::new(store.clone(), config.clone());
        let app = build_router(state);

        Self { app, store, config }
    }

    /// Signs up a user through the API and returns their bearer token
    pub async fn signup(&self, email: &str, password: &str) -> String {
        let response = self
            .post_json(
                "/auth/signup",
                None,
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        body["token"].as_str().expect("signup token").to_string()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.expect("request failed")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(build_request("GET", uri, token, None)).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response<Body> {
        self.send(build_request("POST", uri, token, Some(body))).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(build_request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(build_request("DELETE", uri, token, None)).await
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: None,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        smtp: None,
        reminder_hour: 8,
    }
}

fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("request build failed")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}
