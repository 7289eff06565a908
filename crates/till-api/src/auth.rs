//! Bearer-token authentication.
//!
//! Token issuance and account management belong to the auth collaborator;
//! this extractor only resolves an incoming token to a trusted `UserId`.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use till_commerce::ids::UserId;

/// The authenticated caller.
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(ApiError::unauthorized)?;

        match state.store.resolve_token(token).await? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                tracing::debug!("rejected unknown or expired bearer token");
                Err(ApiError::unauthorized())
            }
        }
    }
}
