/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate name, email format and password length
 * 2. Check if user already exists
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate session token and cookie
 *
 * # Validation
 *
 * - Name must not be blank
 * - Email must contain '@' character (basic validation)
 * - Password must be at least 8 characters long
 * - Email must be unique (409 otherwise)
 */
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::sessions::{create_token, session_cookie};
use crate::backend::auth::users::{create_user, get_user_by_email};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - Blank name, invalid email or short password
/// * `409 Conflict` - Email already registered
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Response, BackendError> {
    let name = request.name.trim();
    let email = request.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(BackendError::bad_request("Name is required"));
    }
    if !email.contains('@') {
        return Err(BackendError::bad_request("Invalid email address"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BackendError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    tracing::info!("Signup request for: {}", email);

    if get_user_by_email(&state.db_pool, &email).await?.is_some() {
        return Err(BackendError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;

    let user = create_user(&state.db_pool, name, &email, &password_hash)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                BackendError::conflict("Email already registered")
            } else {
                BackendError::from(e)
            }
        })?;

    let token = create_token(
        &state.config.jwt_secret,
        state.config.session_ttl_days,
        user.id,
        &user.email,
    )?;

    tracing::info!("User created successfully: {} ({})", user.name, user.id);

    let body = AuthResponse {
        user: UserResponse::from(&user),
        token,
    };
    let mut response = (StatusCode::CREATED, Json(&body)).into_response();
    if let Some(cookie) = session_cookie(&body.token, state.config.session_ttl_days) {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    Ok(response)
}
