/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Routes
 *
 * - `GET /api/chat-data` - Read the chat-room document
 * - `POST /api/chat-data` - Persist the chat-room document
 * - `POST /api/upload-avatar` - Store an avatar image
 * - `POST /api/upload-image` - Store a chat image
 * - `GET /uploads/{key}` - Serve stored objects back
 *
 * # Body Limit
 *
 * The default body limit is raised well past the 10MB upload cap so that
 * oversized uploads reach the handler and get the specific rejection
 * message instead of a bare 413.
 */

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::backend::chat::handlers::{get_chat_data, save_chat_data};
use crate::backend::server::state::AppState;
use crate::backend::upload::handlers::{upload_avatar, upload_image};

/// Upper bound on request bodies; validation below this is the handlers' job
const BODY_LIMIT_BYTES: usize = 32 * 1024 * 1024;

/// Create the Axum router with all routes configured
pub fn create_router(state: AppState) -> Router<()> {
    let uploads_dir = state.uploads.root().to_path_buf();

    Router::new()
        .route("/api/chat-data", get(get_chat_data).post(save_chat_data))
        .route("/api/upload-avatar", post(upload_avatar))
        .route("/api/upload-image", post(upload_image))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .with_state(state)
}
