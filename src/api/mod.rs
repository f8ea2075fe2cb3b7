pub mod auth;
pub mod health;
pub mod pdfs;
pub mod subtopics;
pub mod units;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Uploads need more than axum's 2 MB default body limit. The 5 MiB inline
/// image cap is enforced in its handler, not here.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        // Units
        .route("/units", get(units::list_units).post(units::create_unit))
        .route(
            "/units/:id",
            get(units::get_unit)
                .put(units::update_unit)
                .patch(units::update_unit)
                .delete(units::delete_unit),
        )
        .route("/units/:id/add_subtopic", post(units::add_subtopic))
        // Subtopics
        .route(
            "/subtopics",
            get(subtopics::list_subtopics).post(subtopics::create_subtopic),
        )
        .route(
            "/subtopics/:id",
            get(subtopics::get_subtopic)
                .put(subtopics::update_subtopic)
                .patch(subtopics::update_subtopic)
                .delete(subtopics::delete_subtopic),
        )
        // PDFs
        .route("/pdfs", get(pdfs::list_pdfs).post(pdfs::create_pdf))
        .route(
            "/pdfs/:id",
            get(pdfs::get_pdf)
                .put(pdfs::update_pdf)
                .patch(pdfs::update_pdf)
                .delete(pdfs::delete_pdf),
        )
        // Inline images (rich-text editor)
        .route("/upload-image", post(uploads::upload_image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Translate a domain error into an HTTP response at the API boundary.
/// Backend failures are logged here and surface as a generic message.
pub(crate) fn domain_error_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
        }
        DomainError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        DomainError::Conflict(msg) => {
            (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
        }
        DomainError::Database(msg) => {
            tracing::error!("database error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
        DomainError::Storage(msg) => {
            tracing::error!("storage error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to store file" })),
            )
                .into_response()
        }
    }
}
