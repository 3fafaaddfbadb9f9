/**
 * Chat Data Handlers
 *
 * `GET /api/chat-data` returns the current chat-room document from the
 * first store in the chain that can serve it. `POST /api/chat-data`
 * sanitizes the submitted document and persists it, answering
 * `{"success": true}`.
 *
 * # Sanitization
 *
 * Clients have historically submitted garbled avatar settings (entries
 * without a URL, out-of-range crop values). Those are cleaned up here,
 * before the document reaches any store, to bound document size.
 *
 * # Errors
 *
 * When every store fails, the error converts to HTTP 500 with a
 * machine-readable `{error, details}` body carrying the per-store attempt
 * trail.
 */

use axum::{extract::State, Json};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::ChatRoomDocument;

/// Handle `GET /api/chat-data`
pub async fn get_chat_data(
    State(state): State<AppState>,
) -> Result<Json<ChatRoomDocument>, BackendError> {
    let read = state.storage.read().await?;
    tracing::debug!(rooms = read.document.len(), attempts = ?read.attempts, "served chat data");
    Ok(Json(read.document))
}

/// Handle `POST /api/chat-data`
pub async fn save_chat_data(
    State(state): State<AppState>,
    Json(mut document): Json<ChatRoomDocument>,
) -> Result<Json<serde_json::Value>, BackendError> {
    for room in &mut document {
        room.sanitize();
    }

    let write = state.storage.write(&document).await?;
    tracing::debug!(rooms = document.len(), attempts = ?write.attempts, "saved chat data");
    Ok(Json(serde_json::json!({ "success": true })))
}
