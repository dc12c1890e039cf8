//! Cookbook API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{create_test_user, TestApp};
use crate::{assert_contains_id, assert_status};

#[tokio::test]
async fn test_create_cookbook_requires_name() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let response = app
        .post("/api/cookbooks", &alice.token, json!({ "description": "No name" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cookbook_crud() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let created = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Weeknights" }))
        .await;
    assert_status!(created, StatusCode::CREATED);
    assert_eq!(created.body["is_private"], false);
    assert_eq!(created.body["owner"]["name"], "Alice");
    let uri = format!("/api/cookbooks/{}", created.body["id"].as_str().unwrap());

    let updated = app
        .patch(&uri, &alice.token, json!({ "description": "Quick dinners", "is_private": true }))
        .await;
    assert_status!(updated, StatusCode::OK);
    assert_eq!(updated.body["description"], "Quick dinners");
    assert_eq!(updated.body["is_private"], true);

    let listed = app.get("/api/cookbooks", &alice.token).await;
    assert_eq!(listed.body[0]["recipe_count"], 0);

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_eq!(me.body["stats"]["cookbooks"], 1);

    let deleted = app.delete(&uri, &alice.token).await;
    assert_status!(deleted, StatusCode::NO_CONTENT);
    let gone = app.get(&uri, &alice.token).await;
    assert_status!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_cannot_modify_cookbook() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let created = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Mine" }))
        .await;
    let uri = format!("/api/cookbooks/{}", created.body["id"].as_str().unwrap());

    let patch = app.patch(&uri, &bob.token, json!({ "name": "Ours" })).await;
    assert_status!(patch, StatusCode::FORBIDDEN);

    let delete = app.delete(&uri, &bob.token).await;
    assert_status!(delete, StatusCode::FORBIDDEN);

    let public = app.get(&uri, &bob.token).await;
    assert_status!(public, StatusCode::OK);
}

#[tokio::test]
async fn test_private_cookbook_invite_and_decline() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let created = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Family Secrets", "is_private": true }))
        .await;
    let cookbook_id = created.body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/cookbooks/{}", cookbook_id);

    let hidden = app.get(&uri, &bob.token).await;
    assert_status!(hidden, StatusCode::FORBIDDEN);

    let invited = app
        .post(&format!("{}/invite", uri), &alice.token, json!({ "user_id": bob.id }))
        .await;
    assert_status!(invited, StatusCode::OK);
    assert_contains_id!(invited.body["invited_users"], bob.id);

    let twice = app
        .post(&format!("{}/invite", uri), &alice.token, json!({ "user_id": bob.id }))
        .await;
    assert_status!(twice, StatusCode::BAD_REQUEST);

    let owner = app
        .post(&format!("{}/invite", uri), &alice.token, json!({ "user_id": alice.id }))
        .await;
    assert_status!(owner, StatusCode::BAD_REQUEST);

    // Invitees can see and add to the cookbook right away
    let visible = app.get(&uri, &bob.token).await;
    assert_status!(visible, StatusCode::OK);
    let recipe = app
        .post("/api/recipes", &bob.token, json!({ "title": "Bob's Bread", "cookbook_id": cookbook_id }))
        .await;
    assert_status!(recipe, StatusCode::CREATED);

    let notifications = app.get("/api/notifications", &bob.token).await;
    assert_eq!(notifications.body[0]["kind"], "cookbook_invite");
    assert_eq!(notifications.body[0]["data"]["cookbook_id"], cookbook_id.as_str());
    let notification_id = notifications.body[0]["id"].as_str().unwrap().to_string();

    let declined = app
        .post(
            &format!("/api/notifications/{}/respond", notification_id),
            &bob.token,
            json!({ "accept": false }),
        )
        .await;
    assert_status!(declined, StatusCode::OK);
    assert_eq!(declined.body["status"], "declined");

    let hidden_again = app.get(&uri, &bob.token).await;
    assert_status!(hidden_again, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancel_invite_removes_notification() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let created = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Shared" }))
        .await;
    let uri = format!("/api/cookbooks/{}", created.body["id"].as_str().unwrap());

    app.post(&format!("{}/invite", uri), &alice.token, json!({ "user_id": bob.id }))
        .await;
    let cancelled = app
        .delete(&format!("{}/invite/{}", uri, bob.id), &alice.token)
        .await;
    assert_status!(cancelled, StatusCode::OK);
    assert_eq!(cancelled.body["invited_users"], json!([]));

    let notifications = app.get("/api/notifications", &bob.token).await;
    assert_eq!(notifications.body, json!([]));

    let not_invited = app
        .delete(&format!("{}/invite/{}", uri, bob.id), &alice.token)
        .await;
    assert_status!(not_invited, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_references() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Favourites" }))
        .await;
    let uri = format!("/api/cookbooks/{}", cookbook.body["id"].as_str().unwrap());
    let recipe = app.post("/api/recipes", &bob.token, json!({ "title": "Bob's Chili" })).await;
    let recipe_id = recipe.body["id"].as_str().unwrap().to_string();

    let missing_id = app.post(&format!("{}/recipes", uri), &alice.token, json!({})).await;
    assert_status!(missing_id, StatusCode::BAD_REQUEST);

    let added = app
        .post(&format!("{}/recipes", uri), &alice.token, json!({ "recipe_id": recipe_id }))
        .await;
    assert_contains_id!(added.body["referenced_recipes"], recipe_id);

    let again = app
        .post(&format!("{}/recipes", uri), &alice.token, json!({ "recipe_id": recipe_id }))
        .await;
    assert_eq!(again.body["referenced_recipes"].as_array().unwrap().len(), 1);

    let stranger = app
        .post(&format!("{}/recipes", uri), &bob.token, json!({ "recipe_id": recipe_id }))
        .await;
    assert_status!(stranger, StatusCode::FORBIDDEN);

    let removed = app
        .delete(&format!("{}/recipes/{}", uri, recipe_id), &alice.token)
        .await;
    assert_eq!(removed.body["referenced_recipes"], json!([]));
}

#[tokio::test]
async fn test_deleting_cookbook_keeps_its_recipes() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Temporary" }))
        .await;
    let cookbook_id = cookbook.body["id"].as_str().unwrap().to_string();
    let recipe = app
        .post("/api/recipes", &alice.token, json!({ "title": "Soup", "cookbook_id": cookbook_id }))
        .await;
    let recipe_uri = format!("/api/recipes/{}", recipe.body["id"].as_str().unwrap());

    app.delete(&format!("/api/cookbooks/{}", cookbook_id), &alice.token)
        .await;

    let orphan = app.get(&recipe_uri, &alice.token).await;
    assert_status!(orphan, StatusCode::OK);
    assert!(orphan.body["cookbook_id"].is_null());
}
