//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: an in-process test server,
//! a real TCP server for exercising the operator client over HTTP, and
//! document builders.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum_test::TestServer;
use tempfile::TempDir;

use linemock::backend::server::{create_app_with, ServerConfig};
use linemock::shared::config::ClientConfig;
use linemock::shared::{ChatRoom, Message};

/// In-process server backed by a file store in a throwaway directory.
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn test_server() -> (TestServer, TempDir) {
    let dir = TempDir::new().unwrap();
    let app = create_app_with(ServerConfig::file_only(dir.path()));
    let server = TestServer::new(app).unwrap();
    (server, dir)
}

/// Spawn the app on a real ephemeral port and return its base URL.
/// The operator client talks plain reqwest, so these tests need actual
/// TCP rather than the in-process transport.
pub async fn spawn_server(data_dir: &Path) -> String {
    let app = create_app_with(ServerConfig::file_only(data_dir));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client configuration pointing at `server_url` with all local files in
/// a throwaway directory and the gist uploader disabled.
pub fn client_config(server_url: &str, data_dir: &Path) -> ClientConfig {
    ClientConfig::builder()
        .server_url(server_url)
        .data_dir(data_dir)
        .autosave_interval(Duration::from_secs(120))
        .build()
        .unwrap()
}

/// A 1:1 room with one message from the counterpart
pub fn sample_room(name: &str) -> ChatRoom {
    let mut room = ChatRoom::new(name, false);
    room.push_message(Message::text(
        "こんにちは！",
        false,
        Some(name.to_string()),
        None,
    ));
    room
}
