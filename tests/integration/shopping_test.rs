//! Shopping list API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_status;
use crate::common::{create_test_user, TestApp};

#[tokio::test]
async fn test_shopping_list_items() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let created = app
        .post("/api/shopping-lists", &alice.token, json!({ "name": "Groceries" }))
        .await;
    assert_status!(created, StatusCode::CREATED);
    let uri = format!("/api/shopping-lists/{}", created.body["id"].as_str().unwrap());

    let added = app
        .post(&format!("{}/items", uri), &alice.token, json!({ "name": "Milk", "amount": "1", "unit": "l" }))
        .await;
    assert_status!(added, StatusCode::CREATED);
    let added = app
        .post(&format!("{}/items", uri), &alice.token, json!({ "name": "Eggs" }))
        .await;
    assert_eq!(added.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(added.body["items"][1]["added_by"], alice.id.to_string());

    let blank = app
        .post(&format!("{}/items", uri), &alice.token, json!({ "name": " " }))
        .await;
    assert_status!(blank, StatusCode::BAD_REQUEST);

    let milk_id = added.body["items"][0]["id"].as_str().unwrap().to_string();
    let completed = app
        .patch(&format!("{}/items/{}", uri, milk_id), &alice.token, json!({ "completed": true }))
        .await;
    assert_status!(completed, StatusCode::OK);
    assert_eq!(completed.body["items"][0]["completed"], true);

    let cleared = app
        .post(&format!("{}/clear-completed", uri), &alice.token, json!({}))
        .await;
    assert_eq!(cleared.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(cleared.body["items"][0]["name"], "Eggs");

    let eggs_id = cleared.body["items"][0]["id"].as_str().unwrap().to_string();
    let deleted = app.delete(&format!("{}/items/{}", uri, eggs_id), &alice.token).await;
    assert_eq!(deleted.body["items"], json!([]));

    let missing = app.delete(&format!("{}/items/{}", uri, eggs_id), &alice.token).await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_recipe_merges_ingredients() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let recipe = app
        .post(
            "/api/recipes",
            &alice.token,
            json!({
                "title": "Omelette",
                "ingredients": [
                    { "name": "Eggs", "amount": "3", "unit": "" },
                    { "name": "Butter", "amount": "a knob", "unit": "" }
                ]
            }),
        )
        .await;
    let recipe_id = recipe.body["id"].as_str().unwrap().to_string();

    let list = app
        .post("/api/shopping-lists", &alice.token, json!({ "name": "Brunch" }))
        .await;
    let uri = format!("/api/shopping-lists/{}", list.body["id"].as_str().unwrap());
    app.post(&format!("{}/items", uri), &alice.token, json!({ "name": "eggs", "amount": "2" }))
        .await;

    let merged = app
        .post(&format!("{}/recipes", uri), &alice.token, json!({ "recipe_id": recipe_id }))
        .await;
    assert_status!(merged, StatusCode::OK);
    let items = merged.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["amount"], "5");
    assert_eq!(items[1]["name"], "Butter");
    assert_eq!(merged.body["recipes_added"][0]["recipe"], recipe_id.as_str());

    let missing = app.post(&format!("{}/recipes", uri), &alice.token, json!({})).await;
    assert_status!(missing, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shopping_list_sharing() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let list = app
        .post("/api/shopping-lists", &alice.token, json!({ "name": "Party" }))
        .await;
    let uri = format!("/api/shopping-lists/{}", list.body["id"].as_str().unwrap());

    let outsider = app.get(&uri, &bob.token).await;
    assert_status!(outsider, StatusCode::FORBIDDEN);

    let invited = app
        .post(&format!("{}/invite", uri), &alice.token, json!({ "user_id": bob.id }))
        .await;
    assert_status!(invited, StatusCode::OK);
    assert_eq!(invited.body["invited_users"], json!([bob.id]));

    let member_add = app
        .post(&format!("{}/items", uri), &bob.token, json!({ "name": "Chips" }))
        .await;
    assert_status!(member_add, StatusCode::CREATED);

    let shared = app.get("/api/shopping-lists", &bob.token).await;
    assert_eq!(shared.body[0]["name"], "Party");

    let rename = app.patch(&uri, &bob.token, json!({ "name": "Bob's party" })).await;
    assert_status!(rename, StatusCode::FORBIDDEN);
    let delete = app.delete(&uri, &bob.token).await;
    assert_status!(delete, StatusCode::FORBIDDEN);

    let cancelled = app
        .delete(&format!("{}/invite/{}", uri, bob.id), &alice.token)
        .await;
    assert_status!(cancelled, StatusCode::OK);
    let outsider = app.get(&uri, &bob.token).await;
    assert_status!(outsider, StatusCode::FORBIDDEN);

    let deleted = app.delete(&uri, &alice.token).await;
    assert_status!(deleted, StatusCode::NO_CONTENT);
}
