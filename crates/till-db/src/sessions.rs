//! Session issuance helpers.
//!
//! Token verification is part of [`CommerceStore`]; issuance lives here for
//! the auth collaborator and for test/demo seeding.
//!
//! [`CommerceStore`]: till_commerce::store::CommerceStore

use crate::{storage_err, PgStore};
use chrono::{Duration, Utc};
use sqlx::query;
use till_commerce::error::CommerceError;
use till_commerce::ids::UserId;

impl PgStore {
    /// Issue a bearer token for a user, valid for `ttl`.
    pub async fn create_session(
        &self,
        user_id: UserId,
        ttl: Duration,
    ) -> Result<String, CommerceError> {
        let token = generate_token_string();
        query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id.as_i64())
            .bind(Utc::now() + ttl)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(token)
    }

    /// Drop expired sessions.
    pub async fn purge_expired_sessions(&self) -> Result<u64, CommerceError> {
        let result = query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(result.rows_affected())
    }
}

/// Generate a cryptographically secure token string.
fn generate_token_string() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 24] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_entropy() {
        let token = generate_token_string();
        // 24 bytes base64url encode to 32 characters
        assert_eq!(token.len(), 32);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_tokens_unique() {
        let a = generate_token_string();
        let b = generate_token_string();
        assert_ne!(a, b);
    }
}
