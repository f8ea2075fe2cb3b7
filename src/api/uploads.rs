use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::storage;

use super::domain_error_response;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Inline image upload for the rich-text editor. Stored images are only
/// referenced from notes HTML; there is no record linking them back and
/// nothing ever garbage-collects them.
pub async fn upload_image(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Response {
    let mut image: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or("image").to_string();
            match field.bytes().await {
                Ok(data) => image = Some((filename, data)),
                Err(_) => {
                    return domain_error_response(DomainError::Validation(
                        "could not read uploaded image".to_string(),
                    ));
                }
            }
        }
    }

    let Some((filename, data)) = image else {
        return domain_error_response(DomainError::Validation("No image uploaded".to_string()));
    };

    if data.len() > MAX_IMAGE_BYTES {
        return domain_error_response(DomainError::Validation(
            "Image too large (max 5MB)".to_string(),
        ));
    }

    let key = storage::unique_key("quill_uploads", &filename);
    match state.storage.put(&key, &data).await {
        Ok(url) => (StatusCode::CREATED, Json(json!({ "url": url }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}
