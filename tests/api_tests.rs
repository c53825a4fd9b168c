use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use filmarr::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Bootstrap password used when nothing is configured (documented default).
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // Keep test logins cheap; production defaults are much heavier.
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = filmarr::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    filmarr::api::router(state).await
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Log in and return the session cookie ("name=token") for later requests.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({"username": username, "password": password}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn admin_routes_reject_anonymous_requests() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header(header::COOKIE, "filmarr_session=never-issued-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_session_flow_end_to_end() {
    let app = spawn_app().await;

    let cookie = login(&app, "admin", DEFAULT_ADMIN_PASSWORD).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The destroyed session no longer authorizes anything.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_do_not_reveal_usernames() {
    let app = spawn_app().await;

    let attempt = |username: &str, password: &str| {
        let body = serde_json::json!({"username": username, "password": password}).to_string();
        app.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body))
                .unwrap(),
        )
    };

    let unknown_user = attempt("no-such-user", "whatever").await.unwrap();
    let wrong_password = attempt("admin", "wrong-password").await.unwrap();

    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    // Identical outcome: same body for both failure modes.
    let unknown_body = body_json(unknown_user).await;
    let wrong_body = body_json(wrong_password).await;
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn registered_users_are_never_admins() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({"username": "alice", "password": "pw"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["is_admin"], serde_json::json!(false));
    // Sequential identity after the reserved admin row.
    assert_eq!(body["data"]["id"], serde_json::json!(2));

    // Duplicate username is rejected before insertion.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(
                    serde_json::json!({"username": "alice", "password": "other"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A valid non-admin session gets 403, not 401, on admin routes.
    let cookie = login(&app, "alice", "pw").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But the session itself is fine for user-scoped routes.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/user")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn demo_catalog_is_browsable_without_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies?category=Drama")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let dramas = body["data"].as_array().unwrap();
    assert_eq!(dramas.len(), 1);
    assert_eq!(dramas[0]["title"], "The Shawshank Redemption");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies?category=Mockumentary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn movie_crud_via_admin_routes() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", DEFAULT_ADMIN_PASSWORD).await;

    let new_movie = serde_json::json!({
        "title": "Heat",
        "description": "A group of professional bank robbers start to feel the heat from police.",
        "image_url": "https://example.com/heat.jpg",
        "download_url": "https://example.com/movies/heat",
        "download_url_1080p": "https://example.com/movies/heat/1080p",
        "file_size_1080p": "2.4 GB",
        "category": "Action",
        "release_year": "1995",
        "rating": "8.3/10",
    });

    // Anonymous and cookie-less creation is rejected outright.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/movies")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(new_movie.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/movies")
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .header(header::COOKIE, &cookie)
                .body(Body::from(new_movie.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["language"], "English");
    assert_eq!(body["data"]["download_count"], 0);

    // Public read of the new row.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/movies/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Partial update leaves untouched fields alone.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/admin/movies/{id}"))
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    serde_json::json!({"rating": "8.5/10"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["rating"], "8.5/10");
    assert_eq!(body["data"]["title"], "Heat");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/movies/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/movies/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_counter_increments() {
    let app = spawn_app().await;

    for expected in 1..=2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/movies/1/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["download_count"], expected);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/9999/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_reflect_downloads() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin", DEFAULT_ADMIN_PASSWORD).await;

    for _ in 0..3 {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/movies/2/download")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["total_movies"], 3);
    assert_eq!(body["data"]["total_downloads"], 3);
    assert_eq!(body["data"]["top_movies"][0]["id"], 2);
    assert_eq!(body["data"]["top_movies"][0]["download_count"], 3);
}
