use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::sessions;

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a session for a user and return its opaque token.
    pub async fn create(&self, user_id: i32, ttl_seconds: i64) -> Result<String> {
        let token = generate_session_token();
        let now = chrono::Utc::now();

        let session = sessions::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            expires_at: Set(now.timestamp() + ttl_seconds),
            created_at: Set(now.to_rfc3339()),
        };
        session
            .insert(&self.conn)
            .await
            .context("Failed to insert session")?;

        Ok(token)
    }

    /// Resolve a token to its user id.
    ///
    /// Returns `None` when the token is absent OR already expired — the
    /// expiry check here is the correctness guarantee; the pruning job only
    /// bounds table growth and a not-yet-pruned row is never trusted.
    pub async fn lookup(&self, token: &str) -> Result<Option<i32>> {
        let session = sessions::Entity::find_by_id(token)
            .one(&self.conn)
            .await
            .context("Failed to query session")?;

        let Some(session) = session else {
            return Ok(None);
        };

        if session.expires_at <= chrono::Utc::now().timestamp() {
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    /// Remove a session unconditionally. Destroying an absent token is not
    /// an error.
    pub async fn destroy(&self, token: &str) -> Result<()> {
        sessions::Entity::delete_by_id(token)
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    /// Delete every expired session row. Returns the number removed.
    pub async fn prune_expired(&self) -> Result<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(chrono::Utc::now().timestamp()))
            .exec(&self.conn)
            .await
            .context("Failed to prune expired sessions")?;

        Ok(result.rows_affected)
    }
}

/// Generate a random session token (64 character hex string)
#[must_use]
pub fn generate_session_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::generate_session_token;

    #[test]
    fn tokens_are_unique_and_hex() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
