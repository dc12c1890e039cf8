//! Global search integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{create_test_user, TestApp};
use crate::{assert_contains_id, assert_status};

#[tokio::test]
async fn test_search_requires_query() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let missing = app.get("/api/search", &alice.token).await;
    assert_status!(missing, StatusCode::BAD_REQUEST);
    let blank = app.get("/api/search?q=%20%20", &alice.token).await;
    assert_status!(blank, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_across_collections() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let basil = create_test_user(&app, "Basil Fawlty").await;

    let recipe = app
        .post(
            "/api/recipes",
            &alice.token,
            json!({
                "title": "Pesto Pasta",
                "ingredients": [{ "name": "Fresh basil", "amount": "1", "unit": "bunch" }]
            }),
        )
        .await;
    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Basil and friends" }))
        .await;
    app.post(
        "/api/cookbooks",
        &basil.token,
        json!({ "name": "Basil's private basil", "is_private": true }),
    )
    .await;

    let results = app.get("/api/search?q=BASIL", &alice.token).await;
    assert_status!(results, StatusCode::OK);
    assert_contains_id!(results.body["recipes"], recipe.body["id"].as_str().unwrap());
    assert_contains_id!(results.body["users"], basil.id);
    assert_contains_id!(results.body["cookbooks"], cookbook.body["id"].as_str().unwrap());
    assert_eq!(results.body["cookbooks"].as_array().unwrap().len(), 1);

    let own = app.get("/api/search?q=basil", &basil.token).await;
    assert_eq!(own.body["cookbooks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_hides_private_cookbook_recipes() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;

    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Secrets", "is_private": true }))
        .await;
    app.post(
        "/api/recipes",
        &alice.token,
        json!({ "title": "Secret Curry", "cookbook_id": cookbook.body["id"] }),
    )
    .await;
    app.post("/api/recipes", &alice.token, json!({ "title": "Open Curry" }))
        .await;

    let for_bob = app.get("/api/search?q=curry", &bob.token).await;
    let titles: Vec<&str> = for_bob.body["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|recipe| recipe["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Open Curry"]);

    let for_alice = app.get("/api/search?q=curry", &alice.token).await;
    assert_eq!(for_alice.body["recipes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_ignores_case_of_accented_letters() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let elodie = create_test_user(&app, "Élodie").await;

    let recipe = app
        .post("/api/recipes", &alice.token, json!({ "title": "CRÈME Brûlée" }))
        .await;
    let cookbook = app
        .post("/api/cookbooks", &alice.token, json!({ "name": "Pâtisserie" }))
        .await;

    // "crème"
    let results = app.get("/api/search?q=cr%C3%A8me", &elodie.token).await;
    assert_status!(results, StatusCode::OK);
    assert_contains_id!(results.body["recipes"], recipe.body["id"].as_str().unwrap());

    // "élodie"
    let users = app.get("/api/search?q=%C3%A9lodie", &alice.token).await;
    assert_contains_id!(users.body["users"], elodie.id);

    // "PÂTIS"
    let cookbooks = app.get("/api/search?q=P%C3%82TIS", &elodie.token).await;
    assert_contains_id!(cookbooks.body["cookbooks"], cookbook.body["id"].as_str().unwrap());
}
