use axum::{
    Json,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, UserDto};
use crate::services::Capability;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Resolved identity attached to the request by the admin gate.
#[derive(Clone)]
pub struct AuthUser {
    pub user_id: i32,
}

// ============================================================================
// Middleware
// ============================================================================

/// Admin gate for everything nested under `/api/admin`. Resolves the session
/// cookie and demands the admin capability before any handler runs; a single
/// rejection short-circuits the request with no side effects.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = state.config().read().await.auth.session_cookie.clone();

    let Some(token) = jar.get(&cookie_name).map(Cookie::value) else {
        return Err(ApiError::Unauthenticated("Not authenticated".to_string()));
    };

    let user_id = state
        .auth()
        .authorize(token, Some(Capability::Admin))
        .await?;

    tracing::Span::current().record("user_id", user_id);
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
/// Authenticate with username and password; sets the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserDto>>), ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let session = state
        .auth()
        .login(&payload.username, &payload.password)
        .await?;

    let cookie_name = state.config().read().await.auth.session_cookie.clone();
    let cookie = Cookie::build((cookie_name, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(ApiResponse::success(UserDto::from(session.user))),
    ))
}

/// POST /api/logout
/// Invalidate the current session. Succeeds whether or not one exists.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    let cookie_name = state.config().read().await.auth.session_cookie.clone();

    let jar = if let Some(token) = jar.get(&cookie_name).map(Cookie::value) {
        state.auth().logout(token).await;
        jar.remove(Cookie::build((cookie_name, "")).path("/").build())
    } else {
        jar
    };

    Ok((
        jar,
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out".to_string(),
        })),
    ))
}

/// POST /api/register
/// Create an ordinary account. Admin status is never grantable here.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth()
        .register(&payload.username, &payload.password)
        .await?;

    tracing::info!("User registered: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// GET /api/user
/// The user behind the current session.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let cookie_name = state.config().read().await.auth.session_cookie.clone();

    let Some(token) = jar.get(&cookie_name).map(Cookie::value) else {
        return Err(ApiError::Unauthenticated("Not authenticated".to_string()));
    };

    let user = state.auth().current_user(token).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
