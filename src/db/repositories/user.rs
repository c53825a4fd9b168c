use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::config::SecurityConfig;
use crate::constants::{ADMIN_USER_ID, ADMIN_USERNAME};
use crate::entities::users;
use crate::models::user::User;
use crate::services::password;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by username together with the stored password hash (login path)
    pub async fn get_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    /// Get the record at the reserved admin identity.
    pub async fn get_admin(&self) -> Result<Option<User>> {
        self.get_by_id(ADMIN_USER_ID).await
    }

    /// Insert the reserved admin row (id 1) unless it already exists.
    /// Returns true when the row was created by this call.
    ///
    /// Invoked exactly once at process startup, after migrations. A second
    /// admin row is a startup invariant violation, which the reserved-id
    /// insert makes impossible rather than merely unlikely.
    pub async fn ensure_admin(
        &self,
        plaintext_password: &str,
        config: &SecurityConfig,
    ) -> Result<bool> {
        if self.get_admin().await?.is_some() {
            return Ok(false);
        }

        let password = plaintext_password.to_string();
        let config = config.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            password::hash_password(&password, Some(&config))
        })
        .await
        .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let admin = users::ActiveModel {
            id: Set(ADMIN_USER_ID),
            username: Set(ADMIN_USERNAME.to_string()),
            password_hash: Set(password_hash),
            is_admin: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };
        admin
            .insert(&self.conn)
            .await
            .context("Failed to insert admin user")?;

        Ok(true)
    }

    /// Create an ordinary (never admin) user with the next sequential id.
    /// Returns `Ok(None)` when the username is already taken; the uniqueness
    /// check runs before the insert so the unique column never reports a
    /// constraint violation on this path.
    pub async fn create(
        &self,
        username: &str,
        plaintext_password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        if self.get_by_username(username).await?.is_some() {
            return Ok(None);
        }

        let password = plaintext_password.to_string();
        let config = config.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            password::hash_password(&password, Some(&config))
        })
        .await
        .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let user = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_admin: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = user
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(Some(User::from(model)))
    }

    /// Verify a password attempt for a username. An absent user verifies
    /// false, indistinguishable from a wrong password.
    /// Note: this uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, attempt: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        password::verify_blocking(attempt.to_string(), user.password_hash).await
    }
}
