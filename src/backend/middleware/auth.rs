/**
 * Authentication Extractor
 *
 * Every protected route takes an `AuthUser` argument. The extractor:
 * 1. Reads the session token from `Authorization: Bearer` or the session cookie
 * 2. Verifies the token with the configured secret
 * 3. Resolves the claims' email to the stored user document
 *
 * Any failure rejects the request with 401 before the handler runs.
 */
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::backend::auth::sessions::{token_from_headers, verify_token};
use crate::backend::auth::users::{get_user_by_email, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Axum extractor for the authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or_else(|| {
            tracing::debug!("No session token on request");
            BackendError::unauthorized("Authentication required")
        })?;

        let claims = verify_token(&state.config.jwt_secret, &token).map_err(|e| {
            tracing::warn!("Invalid session token: {:?}", e);
            BackendError::unauthorized("Invalid or expired session")
        })?;

        let user = get_user_by_email(&state.db_pool, &claims.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Session for unknown user: {}", claims.email);
                BackendError::unauthorized("Invalid or expired session")
            })?;

        Ok(AuthUser(user))
    }
}
