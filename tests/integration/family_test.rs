//! Family API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{create_test_user, TestApp};
use crate::{assert_contains_id, assert_status};

#[tokio::test]
async fn test_create_join_and_leave_family() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let none = app.get("/api/families/mine", &alice.token).await;
    assert_status!(none, StatusCode::NOT_FOUND);

    let created = app
        .post("/api/families", &alice.token, json!({ "name": "The Smiths" }))
        .await;
    assert_status!(created, StatusCode::CREATED);
    let code = created.body["invite_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);

    let second = app
        .post("/api/families", &alice.token, json!({ "name": "Another" }))
        .await;
    assert_status!(second, StatusCode::BAD_REQUEST);

    let bad_code = app
        .post("/api/families/join", &bob.token, json!({ "invite_code": "ZZZZZZZZ" }))
        .await;
    assert_status!(bad_code, StatusCode::NOT_FOUND);

    let joined = app
        .post("/api/families/join", &bob.token, json!({ "invite_code": code.to_lowercase() }))
        .await;
    assert_status!(joined, StatusCode::OK);
    assert_contains_id!(joined.body["members"], bob.id);

    let me = app.get("/api/auth/me", &bob.token).await;
    assert_eq!(me.body["family_id"], created.body["id"]);

    let alice_left = app.post("/api/families/leave", &alice.token, json!({})).await;
    assert_status!(alice_left, StatusCode::NO_CONTENT);
    let remaining = app.get("/api/families/mine", &bob.token).await;
    assert_eq!(remaining.body["members"].as_array().unwrap().len(), 1);

    // The last member leaving deletes the family
    app.post("/api/families/leave", &bob.token, json!({})).await;
    let rejoin = app
        .post("/api/families/join", &alice.token, json!({ "invite_code": code }))
        .await;
    assert_status!(rejoin, StatusCode::NOT_FOUND);

    let not_member = app.post("/api/families/leave", &bob.token, json!({})).await;
    assert_status!(not_member, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_family_invite_flow() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let outsider = app
        .post("/api/families/invite", &bob.token, json!({ "user_id": alice.id }))
        .await;
    assert_status!(outsider, StatusCode::FORBIDDEN);

    app.post("/api/families", &alice.token, json!({ "name": "The Smiths" }))
        .await;
    let invited = app
        .post("/api/families/invite", &alice.token, json!({ "user_id": bob.id }))
        .await;
    assert_status!(invited, StatusCode::OK);

    let self_invite = app
        .post("/api/families/invite", &alice.token, json!({ "user_id": alice.id }))
        .await;
    assert_status!(self_invite, StatusCode::BAD_REQUEST);

    let inbox = app.get("/api/notifications", &bob.token).await;
    assert_eq!(inbox.body[0]["kind"], "family_invite");
    let notification_id = inbox.body[0]["id"].as_str().unwrap().to_string();

    let accepted = app
        .post(
            &format!("/api/notifications/{}/respond", notification_id),
            &bob.token,
            json!({ "accept": true }),
        )
        .await;
    assert_status!(accepted, StatusCode::OK);

    let family = app.get("/api/families/mine", &bob.token).await;
    assert_status!(family, StatusCode::OK);
    assert_contains_id!(family.body["members"], bob.id);
    assert_contains_id!(family.body["members"], alice.id);
}
