//! Recipe API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_test_user, TestApp, TestUser};
use crate::{assert_contains_id, assert_status};

pub async fn create_recipe(app: &TestApp, user: &TestUser, body: Value) -> Value {
    let response = app.post("/api/recipes", &user.token, body).await;
    assert_status!(response, StatusCode::CREATED);
    response.body
}

#[tokio::test]
async fn test_create_and_get_recipe() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let recipe = create_recipe(
        &app,
        &alice,
        json!({
            "title": "  Tomato Soup ",
            "ingredients": [{ "name": "Tomato", "amount": "4", "unit": "" }],
            "instructions": ["Chop", "Simmer"],
            "servings": 2,
            "tags": ["soup"]
        }),
    )
    .await;
    assert_eq!(recipe["title"], "Tomato Soup");
    assert_eq!(recipe["owner"]["name"], "Alice");
    assert!(recipe["average_rating"].is_null());

    let id = recipe["id"].as_str().unwrap();
    let fetched = app.get(&format!("/api/recipes/{}", id), &alice.token).await;
    assert_status!(fetched, StatusCode::OK);
    assert_eq!(fetched.body["instructions"], json!(["Chop", "Simmer"]));

    let listed = app.get("/api/recipes", &alice.token).await;
    assert_contains_id!(listed.body, id);

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_eq!(me.body["stats"]["recipes"], 1);
}

#[tokio::test]
async fn test_create_recipe_validation() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let untitled = app.post("/api/recipes", &alice.token, json!({ "title": "" })).await;
    assert_status!(untitled, StatusCode::BAD_REQUEST);

    let missing_cookbook = app
        .post(
            "/api/recipes",
            &alice.token,
            json!({ "title": "Soup", "cookbook_id": uuid::Uuid::new_v4() }),
        )
        .await;
    assert_status!(missing_cookbook, StatusCode::NOT_FOUND);

    let malformed = app.post("/api/recipes", &alice.token, json!({ "title": 5 })).await;
    assert_status!(malformed, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_owner_cannot_modify_recipe() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let recipe = create_recipe(&app, &alice, json!({ "title": "Soup" })).await;
    let uri = format!("/api/recipes/{}", recipe["id"].as_str().unwrap());

    let patch = app.patch(&uri, &bob.token, json!({ "title": "Mine now" })).await;
    assert_status!(patch, StatusCode::FORBIDDEN);

    let delete = app.delete(&uri, &bob.token).await;
    assert_status!(delete, StatusCode::FORBIDDEN);

    let owner_patch = app.patch(&uri, &alice.token, json!({ "title": "Better Soup" })).await;
    assert_status!(owner_patch, StatusCode::OK);
    assert_eq!(owner_patch.body["title"], "Better Soup");

    let owner_delete = app.delete(&uri, &alice.token).await;
    assert_status!(owner_delete, StatusCode::NO_CONTENT);
    let gone = app.get(&uri, &alice.token).await;
    assert_status!(gone, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_in_private_cookbook_is_hidden() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Secrets", "is_private": true }))
        .await;
    let cookbook_id = cookbook.body["id"].as_str().unwrap().to_string();
    let recipe = create_recipe(
        &app,
        &alice,
        json!({ "title": "Grandma's Stew", "cookbook_id": cookbook_id }),
    )
    .await;
    let uri = format!("/api/recipes/{}", recipe["id"].as_str().unwrap());

    let hidden = app.get(&uri, &bob.token).await;
    assert_status!(hidden, StatusCode::FORBIDDEN);

    let copy = app.post(&format!("{}/copy", uri), &bob.token, json!({})).await;
    assert_status!(copy, StatusCode::FORBIDDEN);

    let in_cookbook = app
        .get(&format!("/api/recipes?cookbook_id={}", cookbook_id), &alice.token)
        .await;
    assert_contains_id!(in_cookbook.body, recipe["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_copy_recipe() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let recipe = create_recipe(
        &app,
        &alice,
        json!({ "title": "Pancakes", "ingredients": [{ "name": "Flour", "amount": "200", "unit": "g" }] }),
    )
    .await;
    let source_id = recipe["id"].as_str().unwrap();

    let copy = app
        .post(&format!("/api/recipes/{}/copy", source_id), &bob.token, json!({}))
        .await;
    assert_status!(copy, StatusCode::CREATED);
    assert_ne!(copy.body["id"], recipe["id"]);
    assert_eq!(copy.body["owner_id"], bob.id.to_string());
    assert_eq!(copy.body["copied_from"]["recipe"], source_id);
    assert_eq!(copy.body["copied_from"]["user"], alice.id.to_string());
    assert_eq!(copy.body["ingredients"][0]["name"], "Flour");
}

#[tokio::test]
async fn test_move_recipe_between_cookbooks() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let first = app.post("/api/cookbooks", &alice.token, json!({ "name": "First" })).await;
    let second = app.post("/api/cookbooks", &alice.token, json!({ "name": "Second" })).await;
    let first_id = first.body["id"].as_str().unwrap().to_string();
    let second_id = second.body["id"].as_str().unwrap().to_string();

    let recipe = create_recipe(&app, &alice, json!({ "title": "Soup", "cookbook_id": first_id })).await;
    let recipe_id = recipe["id"].as_str().unwrap();

    let moved = app
        .patch(
            &format!("/api/recipes/{}", recipe_id),
            &alice.token,
            json!({ "cookbook_id": second_id }),
        )
        .await;
    assert_status!(moved, StatusCode::OK);
    assert_eq!(moved.body["cookbook_id"], second_id.as_str());

    let first = app.get(&format!("/api/cookbooks/{}", first_id), &alice.token).await;
    assert_eq!(first.body["recipes"], json!([]));
    let second = app.get(&format!("/api/cookbooks/{}", second_id), &alice.token).await;
    assert_contains_id!(second.body["recipes"], recipe_id);
}
