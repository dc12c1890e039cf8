//! Authentication test helpers
//!
//! Provides utilities for creating test users through the signup endpoint
//! and reusing their session tokens.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::database::TestApp;

/// Password used for every test account
pub const TEST_PASSWORD: &str = "password123";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Sign up a user with the given display name
///
/// The email is derived from the name, so names must be unique per app.
pub async fn create_test_user(app: &TestApp, name: &str) -> TestUser {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    let response = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": name, "email": email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.body);

    TestUser {
        id: response.body["user"]["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("signup response has a user id"),
        name: name.to_string(),
        email,
        token: response.body["token"]
            .as_str()
            .expect("signup response has a token")
            .to_string(),
    }
}

/// Mark a user's profile private
pub async fn make_private(app: &TestApp, user: &TestUser) {
    let response = app
        .patch("/api/users/me", &user.token, json!({ "is_private": true }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
