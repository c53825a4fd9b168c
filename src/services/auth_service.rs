//! Domain service for login, logout, registration, and per-request
//! authorization against the session store.

use serde::Serialize;
use thiserror::Error;

use crate::models::user::User;

/// Errors specific to authentication and authorization.
///
/// `InvalidCredentials` deliberately covers both an unknown username and a
/// wrong password — callers must not be able to tell which one happened.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// What a protected route demands of the resolved user. Only one privileged
/// role exists today; an enum keeps the check in one place instead of ad hoc
/// boolean flags at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Admin,
}

/// Successful login: the session token plus the resolved user.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
}

/// Domain service trait for the authentication gate.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and establishes a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username and
    /// for a wrong password alike.
    async fn login(&self, username: &str, password: &str) -> Result<LoginSession, AuthError>;

    /// Destroys the session behind a token. Always succeeds from the
    /// caller's perspective; a token that never existed is a no-op.
    async fn logout(&self, token: &str);

    /// Creates an ordinary (never admin) account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUsername`] when the name is taken.
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves a token and checks the required capability. Returns the
    /// user id on success.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] for an absent, destroyed, or expired
    /// session; [`AuthError::Forbidden`] for a valid session lacking the
    /// capability.
    async fn authorize(
        &self,
        token: &str,
        capability: Option<Capability>,
    ) -> Result<i32, AuthError>;

    /// Loads the user behind a valid session token.
    async fn current_user(&self, token: &str) -> Result<User, AuthError>;
}
