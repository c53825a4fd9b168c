/// Reserved identity of the bootstrap admin account. Never reassigned.
pub const ADMIN_USER_ID: i32 = 1;

/// Username of the bootstrap admin account.
pub const ADMIN_USERNAME: &str = "admin";

/// Fallback bootstrap password. Deploying with this is a known weak
/// default; startup warns loudly when it is in effect.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
