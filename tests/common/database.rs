//! Database test fixtures and utilities
//!
//! Provides an application wired to a fresh in-memory SQLite database and
//! helpers for sending requests to it without binding a socket.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use cookshare::backend::db::connect_in_memory;
use cookshare::backend::server::{create_app_with_pool, ServerConfig};

/// Secret used to sign test session tokens
pub const TEST_JWT_SECRET: &str = "cookshare-test-secret";

/// Create a migrated in-memory pool
pub async fn create_test_pool() -> SqlitePool {
    let pool = connect_in_memory()
        .await
        .expect("Failed to create test database pool");
    cookshare::backend::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Configuration with the cheapest bcrypt cost
pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret(TEST_JWT_SECRET)
        .bcrypt_cost(4)
        .build()
        .expect("Failed to build test configuration")
}

/// Response status plus the decoded body (`Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application fixture
///
/// Holds the router and the pool behind it, so tests can call the API and
/// inspect stored documents directly.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    /// Create a new application around a fresh database
    pub async fn new() -> Self {
        let pool = create_test_pool().await;
        let router = create_app_with_pool(pool.clone(), test_config())
            .await
            .expect("Failed to create test app");
        Self { router, pool }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Send a request and decode the JSON response
    pub async fn request(
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
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        // Extractor rejections answer in plain text
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
