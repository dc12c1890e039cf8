//! Profile and follow-graph integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{create_test_user, make_private, TestApp};
use crate::{assert_contains_id, assert_status};

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let response = app
        .patch("/api/users/me", &alice.token, json!({ "bio": "  Loves soup  ", "name": "Alice A" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["bio"], "Loves soup");
    assert_eq!(response.body["name"], "Alice A");

    let blank = app.patch("/api/users/me", &alice.token, json!({ "name": "   " })).await;
    assert_status!(blank, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_public_user() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let response = app
        .post(&format!("/api/users/{}/follow", bob.id), &alice.token, json!({}))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "following");

    let profile = app.get(&format!("/api/users/{}", bob.id), &alice.token).await;
    assert_eq!(profile.body["followers_count"], 1);
    assert_eq!(profile.body["is_following"], true);

    let followers = app.get(&format!("/api/users/{}/followers", bob.id), &alice.token).await;
    assert_contains_id!(followers.body, alice.id);

    let following = app.get(&format!("/api/users/{}/following", alice.id), &bob.token).await;
    assert_contains_id!(following.body, bob.id);

    let notifications = app.get("/api/notifications", &bob.token).await;
    assert_eq!(notifications.body[0]["kind"], "follow");
    assert_eq!(notifications.body[0]["sender"]["name"], "Alice");

    let unfollow = app.delete(&format!("/api/users/{}/follow", bob.id), &alice.token).await;
    assert_eq!(unfollow.body["status"], "not_following");
    let profile = app.get(&format!("/api/users/{}", bob.id), &alice.token).await;
    assert_eq!(profile.body["followers_count"], 0);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let response = app
        .post(&format!("/api/users/{}/follow", alice.id), &alice.token, json!({}))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_private_profile_follow_request_flow() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    make_private(&app, &bob).await;

    let profile = app.get(&format!("/api/users/{}", bob.id), &alice.token).await;
    assert_eq!(profile.body["restricted"], true);
    assert!(profile.body["stats"].is_null());

    let hidden = app.get(&format!("/api/users/{}/creations", bob.id), &alice.token).await;
    assert_status!(hidden, StatusCode::FORBIDDEN);
    let hidden = app.get(&format!("/api/users/{}/followers", bob.id), &alice.token).await;
    assert_status!(hidden, StatusCode::FORBIDDEN);

    let request = app
        .post(&format!("/api/users/{}/follow", bob.id), &alice.token, json!({}))
        .await;
    assert_eq!(request.body["status"], "requested");

    // A second request does not stack another notification
    app.post(&format!("/api/users/{}/follow", bob.id), &alice.token, json!({}))
        .await;
    let notifications = app.get("/api/notifications", &bob.token).await;
    let requests: Vec<_> = notifications
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["kind"] == "follow_request")
        .collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["status"], "pending");

    let notification_id = requests[0]["id"].as_str().unwrap().to_string();
    let accepted = app
        .post(
            &format!("/api/notifications/{}/respond", notification_id),
            &bob.token,
            json!({ "accept": true }),
        )
        .await;
    assert_status!(accepted, StatusCode::OK);
    assert_eq!(accepted.body["status"], "accepted");

    let visible = app.get(&format!("/api/users/{}/creations", bob.id), &alice.token).await;
    assert_status!(visible, StatusCode::OK);

    let again = app
        .post(
            &format!("/api/notifications/{}/respond", notification_id),
            &bob.token,
            json!({ "accept": true }),
        )
        .await;
    assert_status!(again, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unfollow_withdraws_pending_request() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    make_private(&app, &bob).await;

    app.post(&format!("/api/users/{}/follow", bob.id), &alice.token, json!({}))
        .await;
    app.delete(&format!("/api/users/{}/follow", bob.id), &alice.token)
        .await;

    let notifications = app.get("/api/notifications", &bob.token).await;
    assert_eq!(notifications.body, json!([]));
}

#[tokio::test]
async fn test_remove_follower() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    app.post(&format!("/api/users/{}/follow", bob.id), &alice.token, json!({}))
        .await;
    let removed = app.delete(&format!("/api/users/{}/follower", alice.id), &bob.token).await;
    assert_status!(removed, StatusCode::NO_CONTENT);

    let profile = app.get(&format!("/api/users/{}", alice.id), &bob.token).await;
    assert_eq!(profile.body["following_count"], 0);
}

#[tokio::test]
async fn test_search_profiles() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice Waters").await;
    create_test_user(&app, "Bob").await;

    let response = app.get("/api/users/search?q=wat", &alice.token).await;
    assert_status!(response, StatusCode::OK);
    assert_contains_id!(response.body, alice.id);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let blank = app.get("/api/users/search?q=%20", &alice.token).await;
    assert_status!(blank, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_profile() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let response = app
        .get(&format!("/api/users/{}", uuid::Uuid::new_v4()), &alice.token)
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let malformed = app.get("/api/users/not-a-uuid", &alice.token).await;
    assert_status!(malformed, StatusCode::BAD_REQUEST);
}
