//! Local Document Cache
//!
//! Fast-path copy of the chat-room document in the client data dir,
//! mirrored after every successful save and used as the fallback source
//! when the server cannot be reached on load.
//!
//! A cache that fails to parse is treated as absent - the store then stays
//! in an explicit empty state rather than fabricating defaults over
//! whatever the operator had.

use std::path::PathBuf;

use crate::client::error::ClientError;
use crate::shared::ChatRoomDocument;

/// Single-file JSON cache of the document
#[derive(Debug)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// Create a cache at the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the cached document; `None` when missing or unparsable
    pub async fn read(&self) -> Option<ChatRoomDocument> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %err, "failed to read cache");
                }
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to parse cached document");
                None
            }
        }
    }

    /// Mirror the document into the cache file
    pub async fn write(&self, document: &ChatRoomDocument) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string(document)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Remove the cache file
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
