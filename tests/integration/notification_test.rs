//! Notification API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_status;
use crate::common::{create_test_user, TestApp, TestUser};

async fn follow(app: &TestApp, follower: &TestUser, target: &TestUser) {
    let response = app
        .post(&format!("/api/users/{}/follow", target.id), &follower.token, json!({}))
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_unread_count_and_mark_read() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let carol = create_test_user(&app, "Carol").await;

    follow(&app, &bob, &alice).await;
    follow(&app, &carol, &alice).await;

    let count = app.get("/api/notifications/unread-count", &alice.token).await;
    assert_eq!(count.body, json!({ "count": 2 }));

    let inbox = app.get("/api/notifications", &alice.token).await;
    assert_eq!(inbox.body[0]["sender"]["name"], "Carol");
    assert_eq!(inbox.body[1]["sender"]["name"], "Bob");

    let newest = inbox.body[0]["id"].as_str().unwrap().to_string();
    let read = app
        .patch(&format!("/api/notifications/{}/read", newest), &alice.token, json!({}))
        .await;
    assert_status!(read, StatusCode::OK);
    assert_eq!(read.body["read"], true);

    let unread = app.get("/api/notifications?unread=true", &alice.token).await;
    assert_eq!(unread.body.as_array().unwrap().len(), 1);

    let all_read = app
        .post("/api/notifications/read-all", &alice.token, json!({}))
        .await;
    assert_eq!(all_read.body, json!({ "count": 0 }));

    let limited = app.get("/api/notifications?limit=1", &alice.token).await;
    assert_eq!(limited.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_notifications_are_private_to_recipient() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    follow(&app, &bob, &alice).await;
    let inbox = app.get("/api/notifications", &alice.token).await;
    let uri = format!("/api/notifications/{}", inbox.body[0]["id"].as_str().unwrap());

    let stolen = app.patch(&format!("{}/read", uri), &bob.token, json!({})).await;
    assert_status!(stolen, StatusCode::FORBIDDEN);
    let stolen = app.delete(&uri, &bob.token).await;
    assert_status!(stolen, StatusCode::FORBIDDEN);

    let deleted = app.delete(&uri, &alice.token).await;
    assert_status!(deleted, StatusCode::NO_CONTENT);
    let gone = app.delete(&uri, &alice.token).await;
    assert_status!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plain_notifications_take_no_response() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    follow(&app, &bob, &alice).await;
    let inbox = app.get("/api/notifications", &alice.token).await;
    assert!(inbox.body[0]["status"].is_null());

    let response = app
        .post(
            &format!("/api/notifications/{}/respond", inbox.body[0]["id"].as_str().unwrap()),
            &alice.token,
            json!({ "accept": true }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}
