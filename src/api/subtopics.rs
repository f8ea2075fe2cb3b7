use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::domain::{CreateSubtopicInput, DomainError, UpdateSubtopicInput};
use crate::infrastructure::AppState;

use super::domain_error_response;

#[derive(Deserialize)]
pub struct CreateSubtopicRequest {
    #[serde(alias = "unit")]
    pub unit_id: Option<i32>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSubtopicRequest {
    #[serde(alias = "unit")]
    pub unit_id: Option<i32>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

pub async fn list_subtopics(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match state.subtopic_repo.find_all(user.id).await {
        Ok(subs) => (StatusCode::OK, Json(subs)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_subtopic(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.subtopic_repo.find_by_id(user.id, id).await {
        Ok(Some(sub)) => (StatusCode::OK, Json(sub)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Subtopic not found" })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn create_subtopic(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSubtopicRequest>,
) -> impl IntoResponse {
    let Some(unit_id) = payload.unit_id else {
        return domain_error_response(DomainError::Validation("unit is required".to_string()));
    };

    let Some(title) = payload.title else {
        return domain_error_response(DomainError::Validation("title is required".to_string()));
    };

    let input = CreateSubtopicInput {
        unit_id,
        title,
        notes: payload.notes.unwrap_or_default(),
    };

    match state.subtopic_repo.create(user.id, input).await {
        Ok(sub) => (StatusCode::CREATED, Json(sub)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn update_subtopic(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSubtopicRequest>,
) -> impl IntoResponse {
    let input = UpdateSubtopicInput {
        unit_id: payload.unit_id,
        title: payload.title,
        notes: payload.notes,
    };

    match state.subtopic_repo.update(user.id, id, input).await {
        Ok(sub) => (StatusCode::OK, Json(sub)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_subtopic(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.subtopic_repo.delete(user.id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => domain_error_response(e),
    }
}
