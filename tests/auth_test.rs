use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::util::ServiceExt; // for `oneshot`

use coursenotes::api;
use coursenotes::auth::{hash_password, verify_password, AuthKeys, TOKEN_KIND_ACCESS, TOKEN_KIND_REFRESH};
use coursenotes::config::Config;
use coursenotes::db;
use coursenotes::infrastructure::AppState;
use coursenotes::storage::FsObjectStorage;

fn test_config(media_root: &std::path::Path) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 8000,
        public_base_url: Some("http://localhost:8000".to_string()),
        media_root: media_root.to_path_buf(),
        jwt_secret: "test-secret".to_string(),
        access_token_hours: 24,
        refresh_token_days: 7,
        cors_allowed_origins: Vec::new(),
    }
}

async fn setup_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(dir.path());

    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to init DB");
    let storage = Arc::new(FsObjectStorage::new(
        config.media_root.clone(),
        "http://localhost:8000",
    ));
    let state = AppState::new(db, AuthKeys::from_config(&config), storage);

    (api::api_router(state), dir)
}

fn json_request(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
}

#[tokio::test]
async fn test_token_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let keys = AuthKeys::from_config(&test_config(dir.path()));

    let access = keys.create_access_token(1, "alice").expect("access token");
    let refresh = keys.create_refresh_token(1, "alice").expect("refresh token");
    assert_ne!(access, refresh);

    let access_claims = keys.decode_token(&access).expect("decode access");
    assert_eq!(access_claims.sub, "1");
    assert_eq!(access_claims.username, "alice");
    assert_eq!(access_claims.kind, TOKEN_KIND_ACCESS);

    let refresh_claims = keys.decode_token(&refresh).expect("decode refresh");
    assert_eq!(refresh_claims.kind, TOKEN_KIND_REFRESH);
}

#[tokio::test]
async fn test_register_login_flow() {
    let (app, _dir) = setup_app().await;

    // Register
    let payload = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "password123"
    });
    let response = app
        .clone()
        .oneshot(json_request("/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate username is a conflict
    let response = app
        .clone()
        .oneshot(json_request("/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Login
    let login = serde_json::json!({ "username": "alice", "password": "password123" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/login", &login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "alice");
    assert!(json["access"].as_str().is_some());
    assert!(json["refresh"].as_str().is_some());

    // Wrong password and unknown user produce the same response
    let bad = serde_json::json!({ "username": "alice", "password": "nope" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/login", &bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let wrong_password = body_json(response).await;

    let unknown = serde_json::json!({ "username": "nobody", "password": "nope" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/login", &unknown))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let unknown_user = body_json(response).await;

    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let (app, _dir) = setup_app().await;

    let missing_password = serde_json::json!({ "username": "bob" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/register", &missing_password))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing_username = serde_json::json!({ "password": "password123" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/register", &missing_username))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let empty_username = serde_json::json!({ "username": "", "password": "password123" });
    let response = app
        .oneshot(json_request("/auth/register", &empty_username))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_flow() {
    let (app, _dir) = setup_app().await;

    let payload = serde_json::json!({ "username": "carol", "password": "password123" });
    let response = app
        .clone()
        .oneshot(json_request("/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request("/auth/login", &payload))
        .await
        .unwrap();
    let tokens = body_json(response).await;
    let access = tokens["access"].as_str().unwrap().to_string();
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    // A refresh token buys a new access token
    let response = app
        .clone()
        .oneshot(json_request(
            "/auth/refresh",
            &serde_json::json!({ "refresh": refresh }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access"].as_str().is_some());

    // An access token is not a refresh token
    let response = app
        .clone()
        .oneshot(json_request(
            "/auth/refresh",
            &serde_json::json!({ "refresh": access }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage is rejected
    let response = app
        .oneshot(json_request(
            "/auth/refresh",
            &serde_json::json!({ "refresh": "not-a-token" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let (app, _dir) = setup_app().await;

    // No header
    let req = Request::builder()
        .uri("/units")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Malformed header
    let req = Request::builder()
        .uri("/units")
        .method("GET")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token
    let payload = serde_json::json!({ "username": "dave", "password": "password123" });
    app.clone()
        .oneshot(json_request("/auth/register", &payload))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request("/auth/login", &payload))
        .await
        .unwrap();
    let tokens = body_json(response).await;
    let refresh = tokens["refresh"].as_str().unwrap();

    let req = Request::builder()
        .uri("/units")
        .method("GET")
        .header(header::AUTHORIZATION, format!("Bearer {}", refresh))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
