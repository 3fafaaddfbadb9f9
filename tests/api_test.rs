//! Chat data and upload API integration tests
//!
//! Runs the real router against a file store in a throwaway directory.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use pretty_assertions::assert_eq;

use common::{sample_room, test_server};
use linemock::shared::{AvatarSettings, ChatRoom, ChatRoomDocument};

#[tokio::test]
async fn test_first_get_serves_seed_document() {
    let (server, _dir) = test_server();

    let response = server.get("/api/chat-data").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let document: ChatRoomDocument = response.json();
    assert_eq!(document.len(), 1);
    assert_eq!(document[0].id, "room1");
    assert_eq!(document[0].name, "サンプルユーザー");
    assert_eq!(document[0].messages.len(), 3);
}

#[tokio::test]
async fn test_save_then_load_round_trip() {
    let (server, _dir) = test_server();

    let document = vec![sample_room("Alice"), sample_room("Bob")];
    let response = server.post("/api/chat-data").json(&document).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>(),
        serde_json::json!({"success": true})
    );

    let loaded: ChatRoomDocument = server.get("/api/chat-data").await.json();
    assert_eq!(loaded, document);
}

#[tokio::test]
async fn test_save_sanitizes_garbled_avatars() {
    let (server, _dir) = test_server();

    let mut room = sample_room("Alice");
    room.participants[1].avatar_settings = Some(AvatarSettings {
        url: String::new(),
        scale: 42.0,
        position_x: -10.0,
        position_y: 300.0,
    });
    room.participants[0].avatar_settings = Some(AvatarSettings {
        url: "/uploads/avatars/me.png".to_string(),
        scale: 42.0,
        position_x: -10.0,
        position_y: 300.0,
    });

    server.post("/api/chat-data").json(&vec![room]).await;

    let loaded: ChatRoomDocument = server.get("/api/chat-data").await.json();
    // no URL means the entry carried nothing usable
    assert!(loaded[0].participants[1].avatar_settings.is_none());
    // with a URL the crop values are clamped instead
    let local = loaded[0].participants[0].avatar_settings.as_ref().unwrap();
    assert_eq!(local.scale, 3.0);
    assert_eq!(local.position_x, 0.0);
    assert_eq!(local.position_y, 100.0);
}

#[tokio::test]
async fn test_saving_empty_document_sticks() {
    let (server, _dir) = test_server();

    // seed exists on first read
    let seeded: ChatRoomDocument = server.get("/api/chat-data").await.json();
    assert!(!seeded.is_empty());

    // an explicit empty save must not get reseeded on the next read
    server
        .post("/api/chat-data")
        .json(&Vec::<ChatRoom>::new())
        .await;
    let loaded: ChatRoomDocument = server.get("/api/chat-data").await.json();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (server, _dir) = test_server();
    let response = server.get("/api/does-not-exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

fn png_form(bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name("avatar.png").mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_upload_avatar_stores_and_serves_file() {
    let (server, _dir) = test_server();

    let response = server
        .post("/api/upload-avatar")
        .multipart(png_form(vec![0x89, b'P', b'N', b'G']))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    let url = body["url"].as_str().unwrap();
    let path = body["path"].as_str().unwrap();
    assert!(url.starts_with("/uploads/avatars/"));
    assert!(path.starts_with("avatars/"));
    assert!(path.ends_with("_avatar.png"));

    // the stored object is reachable through the static route
    let served = server.get(url).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().as_ref(), [0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_upload_image_uses_chat_images_prefix() {
    let (server, _dir) = test_server();

    let response = server
        .post("/api/upload-image")
        .multipart(png_form(vec![1, 2, 3]))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["url"].as_str().unwrap().starts_with("/uploads/chat-images/"));
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let (server, _dir) = test_server();

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = server.post("/api/upload-avatar").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_rejects_non_image_content_type() {
    let (server, _dir) = test_server();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("doc.pdf")
            .mime_type("application/pdf"),
    );
    let response = server.post("/api/upload-avatar").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Only image files are allowed");
}

#[tokio::test]
async fn test_upload_rejects_oversized_file_without_storing_it() {
    let (server, dir) = test_server();

    let oversized = vec![0u8; 12 * 1024 * 1024];
    let response = server
        .post("/api/upload-avatar")
        .multipart(png_form(oversized))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File size must be less than 10MB");

    // the rejected upload must leave nothing behind in the bucket
    let avatars = dir.path().join("uploads").join("avatars");
    let stored = std::fs::read_dir(&avatars)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_upload_sanitizes_file_name() {
    let (server, _dir) = test_server();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![1])
            .file_name("../../evil name?.png")
            .mime_type("image/png"),
    );
    let response = server.post("/api/upload-avatar").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    let path = body["path"].as_str().unwrap();
    // the key is a single component under the prefix, no separators survive
    let key = path.strip_prefix("avatars/").unwrap();
    assert!(!key.contains('/'));
    assert!(!key.contains('\\'));
    assert!(!key.contains('?'));
    assert!(!key.contains(' '));
}
