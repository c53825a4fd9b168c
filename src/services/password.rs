//! Argon2id password hashing and verification.
//!
//! Every hash gets a fresh random salt, so two users with the same password
//! never share a stored record. Verification is constant-time on the digest
//! comparison (argon2 crate contract). Derivation is CPU-bound and must go
//! through the `*_blocking` wrappers on request paths.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password attempt against a stored PHC record.
///
/// A malformed record is a verification failure, never an error: corrupt
/// stored credentials must reject the login rather than crash the request.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// `hash_password` on the blocking pool, for request handlers.
pub async fn hash_blocking(password: String, config: Option<SecurityConfig>) -> Result<String> {
    task::spawn_blocking(move || hash_password(&password, config.as_ref()))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task panicked: {e}"))?
}

/// `verify_password` on the blocking pool, for request handlers.
pub async fn verify_blocking(password: String, stored_hash: String) -> Result<bool> {
    task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task panicked: {e}"))
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use crate::config::SecurityConfig;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn round_trip_verifies() {
        let cfg = fast_params();
        let hash = hash_password("hunter2", Some(&cfg)).unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let cfg = fast_params();
        let a = hash_password("repeat-after-me", Some(&cfg)).unwrap();
        let b = hash_password("repeat-after-me", Some(&cfg)).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("repeat-after-me", &a));
        assert!(verify_password("repeat-after-me", &b));
    }

    #[test]
    fn malformed_record_fails_closed() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-record"));
        assert!(!verify_password("anything", "deadbeef.cafebabe"));
    }
}
