/// Common test utilities for API tests
///
/// Builds the full router over an in-memory store so requests run through
/// the real extractors, JWT layer and error mapping without a database.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskboard_shared::auth::jwt::issue_token;
use taskboard_shared::store::memory::InMemoryStore;
use taskboard_worker::config::SweeperConfig;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and a valid token
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub app: Router,
    pub token: String,
}

/// Status and parsed JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/taskboard_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_minutes: 60,
        },
        sweeper: SweeperConfig {
            enabled: false,
            ..Default::default()
        },
        seed_demo_data: false,
    }
}

impl TestContext {
    /// Creates a context with an empty store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let app = build_router(AppState::new(store.clone(), test_config()));
        let token = issue_token("tester", TEST_SECRET, 60).expect("failed to issue token");

        Self { store, app, token }
    }

    /// Sends an authenticated request
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(method, uri, body, Some(&format!("Bearer {}", self.token)))
            .await
    }

    /// Sends a request with an explicit (or no) `Authorization` header
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    /// Creates a user through the API and returns its ID
    pub async fn create_user(&self, username: &str) -> i64 {
        let res = self
            .request(
                Method::POST,
                "/api/users",
                Some(serde_json::json!({
                    "username": username,
                    "first_name": "Test",
                    "last_name": "User",
                })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_i64().expect("user id")
    }

    /// Creates a task through the API and returns the response body
    pub async fn create_task(&self, user_id: i64, body: Value) -> TestResponse {
        self.request(Method::POST, &format!("/api/users/{}/tasks", user_id), Some(body))
            .await
    }
}
