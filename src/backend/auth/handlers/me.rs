/**
 * Get Current User Handler
 *
 * GET /api/auth/me returns the caller's own profile, including email, stats,
 * trophies and family. The `AuthUser` extractor has already resolved the
 * session, so this handler only shapes the response.
 */
use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::AuthUser;

/// Get current user handler
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "name": "Alice",
///   "email": "alice@example.com",
///   "stats": { "recipes": 2, "creations": 1, "cookbooks": 1, "yums_received": 0 },
///   "trophies": ["first_recipe", "first_creation", "first_cookbook"]
/// }
/// ```
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
