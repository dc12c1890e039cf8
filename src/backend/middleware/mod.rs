//! Middleware Module
//!
//! Request extractors shared by every protected handler.
//!
//! - **`auth`** - `AuthUser`, resolving the session to a user document
//! - **`json`** - `ApiJson`, a JSON body extractor with API-style rejections

pub mod auth;
pub mod json;

pub use auth::AuthUser;
pub use json::ApiJson;
