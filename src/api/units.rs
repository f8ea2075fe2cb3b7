use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::domain::{CreateSubtopicInput, DomainError};
use crate::infrastructure::AppState;

use super::domain_error_response;

#[derive(Deserialize)]
pub struct CreateUnitRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateUnitRequest {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct AddSubtopicRequest {
    pub title: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/units",
    responses(
        (status = 200, description = "Units owned by the caller"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_units(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match state.unit_repo.find_all(user.id).await {
        Ok(units) => (StatusCode::OK, Json(units)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/units",
    responses(
        (status = 201, description = "Unit created"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUnitRequest>,
) -> impl IntoResponse {
    match state.unit_repo.create(user.id, payload.name).await {
        Ok(unit) => (StatusCode::CREATED, Json(unit)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.unit_repo.find_by_id(user.id, id).await {
        Ok(Some(unit)) => (StatusCode::OK, Json(unit)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Unit not found" })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUnitRequest>,
) -> impl IntoResponse {
    match state.unit_repo.update(user.id, id, payload.name).await {
        Ok(unit) => (StatusCode::OK, Json(unit)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.unit_repo.delete(user.id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Convenience operation: create a subtopic directly under a unit with
/// empty notes.
pub async fn add_subtopic(
    State(state): State<AppState>,
    user: AuthUser,
    Path(unit_id): Path<i32>,
    Json(payload): Json<AddSubtopicRequest>,
) -> impl IntoResponse {
    let title = payload.title.unwrap_or_default();
    if title.is_empty() {
        return domain_error_response(DomainError::Validation("Title required".to_string()));
    }

    let input = CreateSubtopicInput {
        unit_id,
        title,
        notes: String::new(),
    };

    match state.subtopic_repo.create(user.id, input).await {
        Ok(sub) => (StatusCode::CREATED, Json(sub)).into_response(),
        Err(e) => domain_error_response(e),
    }
}
