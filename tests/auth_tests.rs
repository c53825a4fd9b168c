//! Service-level tests for the authentication gate and session store,
//! exercised against an in-memory database without going through HTTP.

use std::sync::Arc;

use filmarr::config::{AuthConfig, SecurityConfig};
use filmarr::db::Store;
use filmarr::services::{AuthError, AuthService, Capability, SeaOrmAuthService};

fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

async fn spawn_gate() -> (Store, Arc<dyn AuthService>) {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");

    let security = fast_security();
    let created = store
        .initialize_admin_user("admin123", &security)
        .await
        .expect("Failed to bootstrap admin");
    assert!(created);

    let auth = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        &AuthConfig::default(),
        security,
    )) as Arc<dyn AuthService>;

    (store, auth)
}

#[tokio::test]
async fn bootstrap_creates_admin_at_reserved_id() {
    let (store, _auth) = spawn_gate().await;

    let admin = store.get_admin_user().await.unwrap().unwrap();
    assert_eq!(admin.id, 1);
    assert_eq!(admin.username, "admin");
    assert!(admin.is_admin);

    // Bootstrap is idempotent: a second call must not create anything.
    let created = store
        .initialize_admin_user("other-password", &fast_security())
        .await
        .unwrap();
    assert!(!created);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (_store, auth) = spawn_gate().await;

    let unknown = auth.login("ghost", "whatever").await.unwrap_err();
    let wrong = auth.login("admin", "wrong-password").await.unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn admin_token_authorizes_and_dies_with_logout() {
    let (_store, auth) = spawn_gate().await;

    let session = auth.login("admin", "admin123").await.unwrap();
    assert_eq!(session.user.id, 1);

    let user_id = auth
        .authorize(&session.token, Some(Capability::Admin))
        .await
        .unwrap();
    assert_eq!(user_id, 1);

    auth.logout(&session.token).await;

    let err = auth
        .authorize(&session.token, Some(Capability::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated));

    // Logging out again is a no-op, not an error.
    auth.logout(&session.token).await;
}

#[tokio::test]
async fn never_issued_token_is_unauthenticated() {
    let (_store, auth) = spawn_gate().await;

    let err = auth
        .authorize("0000feedface0000", Some(Capability::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated));
}

#[tokio::test]
async fn expired_session_is_invalid_before_pruning() {
    let (store, auth) = spawn_gate().await;

    // TTL of zero puts expiry at "now"; the row exists but must not be
    // trusted at lookup time.
    let token = store.create_session(1, 0).await.unwrap();
    assert_eq!(store.lookup_session(&token).await.unwrap(), None);

    let err = auth
        .authorize(&token, Some(Capability::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated));
}

#[tokio::test]
async fn pruning_removes_only_expired_rows() {
    let (store, _auth) = spawn_gate().await;

    let expired = store.create_session(1, 0).await.unwrap();
    let valid = store.create_session(1, 3600).await.unwrap();

    let pruned = store.prune_expired_sessions().await.unwrap();
    assert_eq!(pruned, 1);

    assert_eq!(store.lookup_session(&expired).await.unwrap(), None);
    assert_eq!(store.lookup_session(&valid).await.unwrap(), Some(1));

    // Nothing left to prune.
    assert_eq!(store.prune_expired_sessions().await.unwrap(), 0);
}

#[tokio::test]
async fn non_admin_session_is_forbidden_not_unauthenticated() {
    let (_store, auth) = spawn_gate().await;

    let bob = auth.register("bob", "secret").await.unwrap();
    assert!(!bob.is_admin);
    assert_eq!(bob.id, 2);

    let session = auth.login("bob", "secret").await.unwrap();

    let err = auth
        .authorize(&session.token, Some(Capability::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden));

    // The same session passes a capability-free check.
    let user_id = auth.authorize(&session.token, None).await.unwrap();
    assert_eq!(user_id, 2);
}

#[tokio::test]
async fn duplicate_username_is_rejected_before_insertion() {
    let (_store, auth) = spawn_gate().await;

    auth.register("alice", "pw").await.unwrap();
    let err = auth.register("alice", "other").await.unwrap_err();
    assert!(matches!(err, AuthError::DuplicateUsername));

    // The original credentials still work.
    auth.login("alice", "pw").await.unwrap();
}

#[tokio::test]
async fn register_validates_inputs() {
    let (_store, auth) = spawn_gate().await;

    assert!(matches!(
        auth.register("", "pw").await.unwrap_err(),
        AuthError::Validation(_)
    ));
    assert!(matches!(
        auth.register("carol", "").await.unwrap_err(),
        AuthError::Validation(_)
    ));
}

#[tokio::test]
async fn current_user_follows_the_session() {
    let (_store, auth) = spawn_gate().await;

    let session = auth.login("admin", "admin123").await.unwrap();
    let user = auth.current_user(&session.token).await.unwrap();
    assert_eq!(user.username, "admin");

    auth.logout(&session.token).await;
    assert!(matches!(
        auth.current_user(&session.token).await.unwrap_err(),
        AuthError::Unauthenticated
    ));
}
