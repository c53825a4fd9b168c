//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::config::{AuthConfig, SecurityConfig};
use crate::db::Store;
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService, Capability, LoginSession};
use crate::services::password;

pub struct SeaOrmAuthService {
    store: Store,
    session_ttl_seconds: i64,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, auth: &AuthConfig, security: SecurityConfig) -> Self {
        Self {
            store,
            session_ttl_seconds: auth.session_ttl_hours * 60 * 60,
            security,
        }
    }

    async fn resolve_session(&self, token: &str) -> Result<i32, AuthError> {
        self.store
            .lookup_session(token)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginSession, AuthError> {
        // One error value for "no such user" and "wrong password": the
        // response must not disclose whether the username exists.
        let Some((user, stored_hash)) = self
            .store
            .get_user_by_username_with_password(username)
            .await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = password::verify_blocking(password.to_string(), stored_hash).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .store
            .create_session(user.id, self.session_ttl_seconds)
            .await?;

        Ok(LoginSession { token, user })
    }

    async fn logout(&self, token: &str) {
        // Destroying an absent token is a no-op; a store failure is logged
        // and swallowed so logout never bounces back to the client.
        if let Err(e) = self.store.destroy_session(token).await {
            warn!("Failed to destroy session on logout: {e}");
        }
    }

    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        self.store
            .create_user(username, password, &self.security)
            .await?
            .ok_or(AuthError::DuplicateUsername)
    }

    async fn authorize(
        &self,
        token: &str,
        capability: Option<Capability>,
    ) -> Result<i32, AuthError> {
        let user_id = self.resolve_session(token).await?;

        // A session pointing at a deleted user is as good as no session.
        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        match capability {
            Some(Capability::Admin) if !user.is_admin => Err(AuthError::Forbidden),
            _ => Ok(user.id),
        }
    }

    async fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.resolve_session(token).await?;

        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
