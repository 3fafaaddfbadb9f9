/**
 * Upload Handlers
 *
 * `POST /api/upload-avatar` and `POST /api/upload-image` take a multipart
 * form with a single `file` field and store the image in the bucket.
 *
 * # Validation
 *
 * - The `file` field must be present: 400 `"No file provided"`
 * - Size is capped at 10MB: 400 `"File size must be less than 10MB"`
 * - Only image MIME types (`image/` prefix): 400 `"Only image files are allowed"`
 *
 * The rejection messages are exact; the operator UI matches on them.
 * Nothing is written to the bucket unless all checks pass.
 *
 * # Response
 *
 * `{"url": "/uploads/avatars/<key>", "path": "avatars/<key>"}`
 */

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Maximum accepted file size (10MB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Handle `POST /api/upload-avatar`
pub async fn upload_avatar(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, BackendError> {
    store_upload(&state, multipart, "avatars").await
}

/// Handle `POST /api/upload-image`
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, BackendError> {
    store_upload(&state, multipart, "chat-images").await
}

async fn store_upload(
    state: &AppState,
    mut multipart: Multipart,
    prefix: &str,
) -> Result<Json<serde_json::Value>, BackendError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        BackendError::handler(StatusCode::BAD_REQUEST, format!("Invalid form data: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            BackendError::handler(StatusCode::BAD_REQUEST, format!("Invalid form data: {}", e))
        })?;
        upload = Some((file_name, content_type, bytes.to_vec()));
        break;
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "No file provided",
        ));
    };

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "File size must be less than 10MB",
        ));
    }

    if !content_type.starts_with("image/") {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            "Only image files are allowed",
        ));
    }

    let object = state.uploads.store(prefix, &file_name, &bytes).await?;
    tracing::info!(path = %object.path, size = bytes.len(), "stored upload");

    Ok(Json(serde_json::json!({
        "url": object.url,
        "path": object.path,
    })))
}
