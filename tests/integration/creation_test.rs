//! Creation API integration tests
//!
//! Ratings flowing into recipe averages, yums, comments and mention
//! resolution for the chef and eaten-with fields.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{create_test_user, make_private, TestApp, TestUser};
use crate::{assert_approx_eq, assert_contains_id, assert_status};

async fn create_recipe(app: &TestApp, user: &TestUser, title: &str) -> String {
    let response = app.post("/api/recipes", &user.token, json!({ "title": title })).await;
    assert_status!(response, StatusCode::CREATED);
    response.body["id"].as_str().unwrap().to_string()
}

async fn log_creation(app: &TestApp, user: &TestUser, body: Value) -> Value {
    let response = app.post("/api/creations", &user.token, body).await;
    assert_status!(response, StatusCode::CREATED);
    response.body
}

async fn average_rating(app: &TestApp, user: &TestUser, recipe_id: &str) -> Value {
    app.get(&format!("/api/recipes/{}", recipe_id), &user.token)
        .await
        .body["average_rating"]
        .clone()
}

#[tokio::test]
async fn test_creation_requires_known_recipe() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;

    let no_recipes = app
        .post("/api/creations", &alice.token, json!({ "title": "Dinner", "recipes": [] }))
        .await;
    assert_status!(no_recipes, StatusCode::BAD_REQUEST);

    let unknown = app
        .post(
            "/api/creations",
            &alice.token,
            json!({ "title": "Dinner", "recipes": [{ "recipe_id": uuid::Uuid::new_v4() }] }),
        )
        .await;
    assert_status!(unknown, StatusCode::BAD_REQUEST);

    let recipe_id = create_recipe(&app, &alice, "Soup").await;
    let out_of_range = app
        .post(
            "/api/creations",
            &alice.token,
            json!({ "title": "Dinner", "recipes": [{ "recipe_id": recipe_id, "rating": 7 }] }),
        )
        .await;
    assert_status!(out_of_range, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ratings_update_recipe_average() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let recipe_id = create_recipe(&app, &alice, "Lasagne").await;

    let first = log_creation(
        &app,
        &alice,
        json!({ "title": "Sunday lasagne", "recipes": [{ "recipe_id": recipe_id, "rating": 4 }] }),
    )
    .await;
    assert_eq!(first["recipes"][0]["recipe"]["title"], "Lasagne");
    assert_eq!(average_rating(&app, &alice, &recipe_id).await, json!(4.0));

    let second = log_creation(
        &app,
        &bob,
        json!({ "title": "Tried Alice's lasagne", "recipes": [{ "recipe_id": recipe_id, "rating": 5 }] }),
    )
    .await;
    let average = average_rating(&app, &alice, &recipe_id).await.as_f64().unwrap();
    assert_approx_eq!(average, 4.5, 1e-9);

    // Deleting a creation withdraws its rating
    let deleted = app
        .delete(&format!("/api/creations/{}", second["id"].as_str().unwrap()), &bob.token)
        .await;
    assert_status!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(average_rating(&app, &alice, &recipe_id).await, json!(4.0));

    app.delete(&format!("/api/creations/{}", first["id"].as_str().unwrap()), &alice.token)
        .await;
    assert!(average_rating(&app, &alice, &recipe_id).await.is_null());

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_eq!(me.body["stats"]["creations"], 0);
}

#[tokio::test]
async fn test_updating_recipes_replaces_ratings() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let soup = create_recipe(&app, &alice, "Soup").await;
    let bread = create_recipe(&app, &alice, "Bread").await;

    let creation = log_creation(
        &app,
        &alice,
        json!({ "title": "Lunch", "recipes": [{ "recipe_id": soup, "rating": 3 }] }),
    )
    .await;

    let updated = app
        .patch(
            &format!("/api/creations/{}", creation["id"].as_str().unwrap()),
            &alice.token,
            json!({ "recipes": [{ "recipe_id": bread, "rating": 5 }] }),
        )
        .await;
    assert_status!(updated, StatusCode::OK);
    assert!(average_rating(&app, &alice, &soup).await.is_null());
    assert_eq!(average_rating(&app, &alice, &bread).await, json!(5.0));

    let recipe_creations = app
        .get(&format!("/api/recipes/{}/creations", bread), &alice.token)
        .await;
    assert_contains_id!(recipe_creations.body, creation["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_yum_twice_restores_count() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let recipe_id = create_recipe(&app, &alice, "Curry").await;
    let creation = log_creation(
        &app,
        &alice,
        json!({ "title": "Curry night", "recipes": [{ "recipe_id": recipe_id }] }),
    )
    .await;
    let yum_uri = format!("/api/creations/{}/yum", creation["id"].as_str().unwrap());

    let first = app.post(&yum_uri, &bob.token, json!({})).await;
    assert_status!(first, StatusCode::OK);
    assert_eq!(first.body, json!({ "liked": true, "likes": 1 }));

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_eq!(me.body["stats"]["yums_received"], 1);
    let notifications = app.get("/api/notifications", &alice.token).await;
    assert_eq!(notifications.body[0]["kind"], "yum");

    let second = app.post(&yum_uri, &bob.token, json!({})).await;
    assert_eq!(second.body, json!({ "liked": false, "likes": 0 }));

    let me = app.get("/api/auth/me", &alice.token).await;
    assert_eq!(me.body["stats"]["yums_received"], 0);
}

#[tokio::test]
async fn test_eaten_with_resolves_mentions() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let carol = create_test_user(&app, "Carol").await;
    let recipe_id = create_recipe(&app, &carol, "Paella").await;

    let creation = log_creation(
        &app,
        &carol,
        json!({
            "title": "Paella party",
            "recipes": [{ "recipe_id": recipe_id }],
            "chef": "me",
            "eaten_with": "Thanks @Alice and Bob"
        }),
    )
    .await;

    assert_eq!(creation["eaten_with"], "Thanks @Alice and Bob");
    assert!(creation["chef"].is_null());
    let names: Vec<&str> = creation["eaten_with_users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    for guest in [&alice, &bob] {
        let notifications = app.get("/api/notifications", &guest.token).await;
        assert_eq!(notifications.body[0]["kind"], "mention");
        assert_eq!(notifications.body[0]["sender"]["name"], "Carol");
    }
}

#[tokio::test]
async fn test_chef_by_id() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let recipe_id = create_recipe(&app, &alice, "Tacos").await;

    let creation = log_creation(
        &app,
        &alice,
        json!({ "title": "Taco Tuesday", "recipes": [{ "recipe_id": recipe_id }], "chef_id": bob.id }),
    )
    .await;
    assert_eq!(creation["chef"]["id"], bob.id.to_string());

    let unknown = app
        .post(
            "/api/creations",
            &alice.token,
            json!({ "title": "Taco Tuesday", "recipes": [{ "recipe_id": recipe_id }], "chef_id": uuid::Uuid::new_v4() }),
        )
        .await;
    assert_status!(unknown, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comments() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    let carol = create_test_user(&app, "Carol").await;
    let recipe_id = create_recipe(&app, &alice, "Risotto").await;
    let creation = log_creation(
        &app,
        &alice,
        json!({ "title": "Risotto", "recipes": [{ "recipe_id": recipe_id }] }),
    )
    .await;
    let creation_uri = format!("/api/creations/{}", creation["id"].as_str().unwrap());

    let commented = app
        .post(
            &format!("{}/comments", creation_uri),
            &bob.token,
            json!({ "text": "Looks great, @Carol should try it" }),
        )
        .await;
    assert_status!(commented, StatusCode::CREATED);
    let comment = &commented.body["comments"][0];
    assert_eq!(comment["user"]["name"], "Bob");
    assert_eq!(comment["mentions"][0]["name"], "Carol");
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let owner_inbox = app.get("/api/notifications", &alice.token).await;
    assert_eq!(owner_inbox.body[0]["kind"], "comment");
    let carol_inbox = app.get("/api/notifications", &carol.token).await;
    assert_eq!(carol_inbox.body[0]["kind"], "mention");

    let blank = app
        .post(&format!("{}/comments", creation_uri), &bob.token, json!({ "text": "  " }))
        .await;
    assert_status!(blank, StatusCode::BAD_REQUEST);

    let comment_uri = format!("{}/comments/{}", creation_uri, comment_id);
    let not_author = app.patch(&comment_uri, &alice.token, json!({ "text": "Edited" })).await;
    assert_status!(not_author, StatusCode::FORBIDDEN);

    let edited = app.patch(&comment_uri, &bob.token, json!({ "text": "Edited" })).await;
    assert_status!(edited, StatusCode::OK);
    assert_eq!(edited.body["comments"][0]["text"], "Edited");
    assert!(edited.body["comments"][0]["updated_at"].is_string());

    let stranger = app.delete(&comment_uri, &carol.token).await;
    assert_status!(stranger, StatusCode::FORBIDDEN);

    // The creation owner may remove any comment
    let removed = app.delete(&comment_uri, &alice.token).await;
    assert_status!(removed, StatusCode::OK);
    assert_eq!(removed.body["comments"], json!([]));
}

#[tokio::test]
async fn test_feed_and_private_creations() {
    let app = TestApp::new().await;
    let alice = create_test_user(&app, "Alice").await;
    let bob = create_test_user(&app, "Bob").await;
    make_private(&app, &bob).await;
    let recipe_id = create_recipe(&app, &bob, "Stew").await;
    let creation = log_creation(
        &app,
        &bob,
        json!({ "title": "Stew", "recipes": [{ "recipe_id": recipe_id }] }),
    )
    .await;
    let creation_uri = format!("/api/creations/{}", creation["id"].as_str().unwrap());

    let hidden = app.get(&creation_uri, &alice.token).await;
    assert_status!(hidden, StatusCode::FORBIDDEN);
    let yum = app.post(&format!("{}/yum", creation_uri), &alice.token, json!({})).await;
    assert_status!(yum, StatusCode::FORBIDDEN);

    let own_feed = app.get("/api/creations", &bob.token).await;
    assert_contains_id!(own_feed.body, creation["id"].as_str().unwrap());
    let alice_feed = app.get("/api/creations", &alice.token).await;
    assert_eq!(alice_feed.body, json!([]));

    let not_owner = app.patch(&creation_uri, &alice.token, json!({ "title": "Mine" })).await;
    assert_status!(not_owner, StatusCode::FORBIDDEN);
}
