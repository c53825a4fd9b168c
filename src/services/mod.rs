pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Capability, LoginSession};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod password;
