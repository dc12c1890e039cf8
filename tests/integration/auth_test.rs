//! Authentication API integration tests
//!
//! Tests for signup, login, logout and the current-user endpoint.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::assert_status;
use crate::common::{create_test_user, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Alice", "email": "Alice@Example.com", "password": TEST_PASSWORD })),
        )
        .await;

    assert_status!(response, StatusCode::CREATED);
    assert!(response.body["token"].is_string());
    assert_eq!(response.body["user"]["email"], "alice@example.com");
    assert_eq!(response.body["user"]["stats"]["recipes"], 0);
    assert!(response.body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new().await;
    create_test_user(&app, "Alice").await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Other", "email": "alice@example.com", "password": TEST_PASSWORD })),
        )
        .await;

    assert_status!(response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new().await;

    let short = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Alice", "email": "alice@example.com", "password": "short" })),
        )
        .await;
    assert_status!(short, StatusCode::BAD_REQUEST);

    let nameless = app
        .request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "alice@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_status!(nameless, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_and_wrong_password() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let ok = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": alice.email, "password": TEST_PASSWORD })),
        )
        .await;
    assert_status!(ok, StatusCode::OK);
    assert_eq!(ok.body["user"]["id"], alice.id.to_string());

    let wrong = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": alice.email, "password": "not-the-password" })),
        )
        .await;
    assert_status!(wrong, StatusCode::UNAUTHORIZED);

    let unknown = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_status!(unknown, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let anonymous = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_status!(anonymous, StatusCode::UNAUTHORIZED);

    let forged = app.get("/api/auth/me", "not-a-token").await;
    assert_status!(forged, StatusCode::UNAUTHORIZED);

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_status!(me, StatusCode::OK);
    assert_eq!(me.body["name"], "Alice");
}

#[tokio::test]
async fn test_logout_and_unknown_route() {
    let app = TestApp::new().await;

    let logout = app.request(Method::POST, "/api/auth/logout", None, None).await;
    assert_status!(logout, StatusCode::NO_CONTENT);

    let missing = app.request(Method::GET, "/api/nothing-here", None, None).await;
    assert_status!(missing, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["status"], 404);
}
