//! Common test utilities for router tests
//!
//! Builds the full router over in-memory stores, so these tests run without
//! PostgreSQL. Requests go through every layer the server uses.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use todo_api::{
    app::{build_router, AppState},
    config::Config,
};
use todo_shared::store::memory::{MemoryTodoRepository, MemoryUserStore};
use tower::ServiceExt;

pub const SECRET: &str = "router-test-secret-key-at-least-32-bytes";

/// Test context holding the router and its stores
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub todos: Arc<MemoryTodoRepository>,
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub text: String,
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgresql://unused/unused"),
        ("JWT_SECRET", SECRET),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("Test configuration should load")
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let todos = Arc::new(MemoryTodoRepository::new());
        let state = AppState::with_stores(test_config(), users.clone(), todos.clone())
            .expect("State should build");

        Self {
            app: build_router(state.clone()),
            state,
            users,
            todos,
        }
    }

    /// Sends a request with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        decode(response).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "userName": username,
                "email": email,
                "password": password,
            })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "userName": username, "password": password })),
        )
        .await
    }

    /// Registers a user and returns their token
    pub async fn token_for(&self, username: &str) -> String {
        let response = self
            .register(username, &format!("{}@example.com", username), "Valid123")
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.body["token"].as_str().unwrap().to_string()
    }
}

async fn decode(response: Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
        text,
    }
}

impl TestContext {
    /// Stored id of a registered user, as rendered on the wire
    pub async fn users_id(&self, username: &str) -> String {
        use todo_shared::store::UserStore;

        self.users
            .find_by_username(username)
            .await
            .unwrap()
            .expect("User should exist")
            .id
            .to_string()
    }
}
