use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::movie::{CatalogStats, Movie, MovieUpdate, NewMovie};
use crate::models::user::User;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Each sqlite :memory: connection is its own database, so the pool
        // must collapse to a single connection for the schema to be shared.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Credential store
    // ------------------------------------------------------------------

    /// Seed the reserved admin row if missing. Returns true when this call
    /// created it.
    pub async fn initialize_admin_user(
        &self,
        plaintext_password: &str,
        security: &SecurityConfig,
    ) -> Result<bool> {
        self.user_repo()
            .ensure_admin(plaintext_password, security)
            .await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn get_admin_user(&self) -> Result<Option<User>> {
        self.user_repo().get_admin().await
    }

    /// `Ok(None)` means the username is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        plaintext_password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(username, plaintext_password, security)
            .await
    }

    pub async fn verify_user_password(&self, username: &str, attempt: &str) -> Result<bool> {
        self.user_repo().verify_password(username, attempt).await
    }

    // ------------------------------------------------------------------
    // Session store
    // ------------------------------------------------------------------

    pub async fn create_session(&self, user_id: i32, ttl_seconds: i64) -> Result<String> {
        self.session_repo().create(user_id, ttl_seconds).await
    }

    pub async fn lookup_session(&self, token: &str) -> Result<Option<i32>> {
        self.session_repo().lookup(token).await
    }

    pub async fn destroy_session(&self, token: &str) -> Result<()> {
        self.session_repo().destroy(token).await
    }

    pub async fn prune_expired_sessions(&self) -> Result<u64> {
        self.session_repo().prune_expired().await
    }

    // ------------------------------------------------------------------
    // Movie catalog store
    // ------------------------------------------------------------------

    pub async fn add_movie(&self, movie: &NewMovie) -> Result<Movie> {
        self.movie_repo().add(movie).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn list_movies(&self, category: Option<&str>) -> Result<Vec<Movie>> {
        self.movie_repo().list(category).await
    }

    pub async fn update_movie(&self, id: i32, update: &MovieUpdate) -> Result<Option<Movie>> {
        self.movie_repo().update(id, update).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn record_movie_download(&self, id: i32) -> Result<Option<i64>> {
        self.movie_repo().record_download(id).await
    }

    pub async fn movie_stats(&self) -> Result<CatalogStats> {
        self.movie_repo().stats().await
    }
}
