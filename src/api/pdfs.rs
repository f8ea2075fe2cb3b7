use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::domain::{CreatePdfInput, DomainError, Pdf, UpdatePdfInput};
use crate::infrastructure::AppState;
use crate::storage;

use super::domain_error_response;

/// Metadata-only update payload (rename, re-parent) sent as JSON.
/// Binary replacement goes through the multipart branch of `update_pdf`.
#[derive(Deserialize)]
pub struct UpdatePdfRequest {
    pub title: Option<String>,
    #[serde(alias = "subtopic_id")]
    pub subtopic: Option<i32>,
}

/// Fields collected from a multipart payload; any subset may be present.
#[derive(Default)]
struct MultipartFields {
    title: Option<String>,
    subtopic: Option<i32>,
    file: Option<(String, Bytes)>,
}

async fn read_multipart(mut multipart: Multipart) -> Result<MultipartFields, Response> {
    let bad_request =
        |msg: &str| domain_error_response(DomainError::Validation(msg.to_string()));

    let mut fields = MultipartFields::default();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                fields.title = field.text().await.ok();
            }
            "subtopic" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|_| bad_request("subtopic must be a subtopic id"))?;
                let id = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| bad_request("subtopic must be a subtopic id"))?;
                fields.subtopic = Some(id);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| bad_request("could not read uploaded file"))?;
                fields.file = Some((filename, data));
            }
            _ => {}
        }
    }

    Ok(fields)
}

pub async fn list_pdfs(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    match state.pdf_repo.find_all(user.id).await {
        Ok(pdfs) => (StatusCode::OK, Json(pdfs)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.pdf_repo.find_by_id(user.id, id).await {
        Ok(Some(pdf)) => (StatusCode::OK, Json(pdf)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "PDF not found" })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// Multipart create: `file` (required), `subtopic` (required id), `title`.
/// The subtopic must be visible to the caller before any bytes are stored;
/// a storage failure leaves no record behind.
pub async fn create_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    let Some(subtopic_id) = fields.subtopic else {
        return domain_error_response(DomainError::Validation("subtopic is required".to_string()));
    };

    let Some((filename, data)) = fields.file else {
        return domain_error_response(DomainError::Validation("file is required".to_string()));
    };

    match state.subtopic_repo.find_by_id(user.id, subtopic_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Subtopic not found" })),
            )
                .into_response();
        }
        Err(e) => return domain_error_response(e),
    }

    let key = storage::unique_key("course_files", &filename);
    let file_url = match state.storage.put(&key, &data).await {
        Ok(url) => url,
        Err(e) => return domain_error_response(e),
    };

    let input = CreatePdfInput {
        subtopic_id,
        title: fields.title,
        file_url,
    };

    match state.pdf_repo.create(user.id, input).await {
        Ok(pdf) => (StatusCode::CREATED, Json(pdf)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// One endpoint, two payload shapes: JSON for metadata-only changes
/// (the rename button), multipart to replace the stored binary.
pub async fn update_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    req: Request,
) -> Response {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = match Multipart::from_request(req, &state).await {
            Ok(m) => m,
            Err(_) => {
                return domain_error_response(DomainError::Validation(
                    "invalid multipart body".to_string(),
                ));
            }
        };
        update_pdf_multipart(state, user, id, multipart).await
    } else {
        let Json(payload) = match Json::<UpdatePdfRequest>::from_request(req, &state).await {
            Ok(j) => j,
            Err(rejection) => return rejection.into_response(),
        };

        let input = UpdatePdfInput {
            subtopic_id: payload.subtopic,
            title: payload.title,
            file_url: None,
        };

        match state.pdf_repo.update(user.id, id, input).await {
            Ok(pdf) => (StatusCode::OK, Json(pdf)).into_response(),
            Err(e) => domain_error_response(e),
        }
    }
}

async fn update_pdf_multipart(
    state: AppState,
    user: AuthUser,
    id: i32,
    multipart: Multipart,
) -> Response {
    let fields = match read_multipart(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    // The record must be visible before any bytes are stored; its current
    // file reference is needed to drop the replaced object afterwards.
    let existing: Pdf = match state.pdf_repo.find_by_id(user.id, id).await {
        Ok(Some(pdf)) => pdf,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "PDF not found" })),
            )
                .into_response();
        }
        Err(e) => return domain_error_response(e),
    };

    let mut file_url = None;
    if let Some((filename, data)) = fields.file {
        let key = storage::unique_key("course_files", &filename);
        match state.storage.put(&key, &data).await {
            Ok(url) => file_url = Some(url),
            Err(e) => return domain_error_response(e),
        }
    }

    let replaced = file_url.is_some();
    let input = UpdatePdfInput {
        subtopic_id: fields.subtopic,
        title: fields.title,
        file_url,
    };

    match state.pdf_repo.update(user.id, id, input).await {
        Ok(pdf) => {
            // The record now points at the new object; the old one would
            // dangle forever, so it is removed best-effort.
            if replaced {
                if let Some(old_key) = state.storage.key_for_url(&existing.file) {
                    if let Err(e) = state.storage.delete(&old_key).await {
                        tracing::warn!("failed to delete replaced object {}: {}", old_key, e);
                    }
                }
            }
            (StatusCode::OK, Json(pdf)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.pdf_repo.delete(user.id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => domain_error_response(e),
    }
}
