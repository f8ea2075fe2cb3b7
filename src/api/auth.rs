use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{hash_password, verify_password, TOKEN_KIND_REFRESH};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::user::{self, Entity as User};

use super::domain_error_response;

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Username or password missing"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        return domain_error_response(DomainError::Validation(
            "username and password are required".to_string(),
        ));
    }

    match User::find()
        .filter(user::Column::Username.eq(&username))
        .one(state.db())
        .await
    {
        Ok(Some(_)) => {
            return domain_error_response(DomainError::Conflict(
                "username already exists".to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => return domain_error_response(e.into()),
    }

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("password hashing failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response();
        }
    };

    let new_user = user::ActiveModel {
        username: Set(username),
        email: Set(payload.email.unwrap_or_default()),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    match new_user.insert(state.db()).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully" })),
        )
            .into_response(),
        Err(e) => domain_error_response(e.into()),
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Access and refresh tokens issued"),
        (status = 400, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.username);

    // Unknown user and wrong password must be indistinguishable.
    let invalid = || {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response()
    };

    let user = match User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(state.db())
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => {
            tracing::warn!("User not found: {}", payload.username);
            return invalid();
        }
        Err(e) => return domain_error_response(e.into()),
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {
            let tokens = (
                state.auth.create_access_token(user.id, &user.username),
                state.auth.create_refresh_token(user.id, &user.username),
            );
            match tokens {
                (Ok(access), Ok(refresh)) => (
                    StatusCode::OK,
                    Json(json!({
                        "access": access,
                        "refresh": refresh,
                        "username": user.username,
                    })),
                )
                    .into_response(),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response(),
            }
        }
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            invalid()
        }
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    refresh: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New access token issued"),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let rejected = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid or expired token" })),
        )
            .into_response()
    };

    let claims = match state.auth.decode_token(&payload.refresh) {
        Ok(c) if c.kind == TOKEN_KIND_REFRESH => c,
        _ => return rejected(),
    };

    let user_id = match claims.sub.parse::<i32>() {
        Ok(id) => id,
        Err(_) => return rejected(),
    };

    match state.auth.create_access_token(user_id, &claims.username) {
        Ok(access) => (StatusCode::OK, Json(json!({ "access": access }))).into_response(),
        Err(e) => {
            tracing::error!("token issue failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
