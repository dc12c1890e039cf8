//! API integration tests
//!
//! Integration tests for all API endpoints, one file per resource.

mod auth_test;
mod cookbook_test;
mod creation_test;
mod family_test;
mod notification_test;
mod profile_test;
mod recipe_test;
mod search_test;
mod shopping_test;
