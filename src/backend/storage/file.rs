/**
 * Local File Store
 *
 * Reads and writes the chat-room document as pretty-printed JSON under a
 * working-directory `data` folder. This is the always-available tail of
 * the fallback chain.
 *
 * # Seeding
 *
 * When constructed with `seed_on_missing`, the first read of a missing
 * file creates the directory and writes the sample conversation, so a
 * fresh install shows something instead of an empty room list. The flag is
 * set only when the file store is the primary (no durable backend
 * configured); as a fallback behind a durable store it must never invent
 * data.
 */

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};

use crate::backend::error::BackendError;
use crate::shared::model::LOCAL_USER_NAME;
use crate::shared::{ChatRoom, ChatRoomDocument, Message, Participant};

/// File name of the document inside the data directory
pub const DOCUMENT_FILE: &str = "chat-rooms.json";

/// Local JSON file store
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    seed_on_missing: bool,
}

impl FileStore {
    /// Create a store rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>, seed_on_missing: bool) -> Self {
        Self {
            data_dir: data_dir.into(),
            seed_on_missing,
        }
    }

    /// Path of the document file
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(DOCUMENT_FILE)
    }

    /// Read the document, seeding it first if configured and missing
    pub async fn read(&self) -> Result<Option<ChatRoomDocument>, BackendError> {
        let path = self.document_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let document = serde_json::from_str(&raw)?;
                Ok(Some(document))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if self.seed_on_missing {
                    let seed = seed_document();
                    self.write(&seed).await?;
                    tracing::info!(path = %path.display(), "seeded default chat data");
                    Ok(Some(seed))
                } else {
                    Ok(None)
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist the document, creating the data directory if needed
    pub async fn write(&self, document: &ChatRoomDocument) -> Result<(), BackendError> {
        ensure_dir(&self.data_dir).await?;
        let raw = serde_json::to_string_pretty(document)?;
        tokio::fs::write(self.document_path(), raw).await?;
        Ok(())
    }
}

async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if tokio::fs::metadata(dir).await.is_err() {
        tokio::fs::create_dir_all(dir).await?;
    }
    Ok(())
}

/// The sample conversation written on first access
pub fn seed_document() -> ChatRoomDocument {
    let now = Utc::now();
    let other = "サンプルユーザー";

    let mut room = ChatRoom {
        id: "room1".to_string(),
        name: other.to_string(),
        last_message: None,
        last_message_time: None,
        unread_count: 0,
        is_group: false,
        participants: vec![Participant::local_user(), Participant::new("user2", other)],
        messages: Vec::new(),
    };

    let greetings = [
        ("1", "こんにちは！", false, 30),
        ("2", "こんにちは！元気ですか？", true, 20),
        ("3", "はい、元気です！今日はいい天気ですね。", false, 10),
    ];
    for (id, text, is_user, seconds_ago) in greetings {
        room.messages.push(Message {
            id: id.to_string(),
            text: text.to_string(),
            is_user,
            timestamp: now - Duration::seconds(seconds_ago),
            user_name: Some(if is_user { LOCAL_USER_NAME } else { other }.to_string()),
            avatar_settings: None,
            is_read: if is_user { Some(true) } else { None },
            user_id: None,
            image_url: None,
            is_stamp: None,
            is_date_separator: None,
        });
    }

    room.last_message = room.messages.last().map(|m| m.text.clone());
    room.last_message_time = Some(now);
    vec![room]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_only_when_configured() {
        let dir = TempDir::new().unwrap();

        let silent = FileStore::new(dir.path().join("a"), false);
        assert!(silent.read().await.unwrap().is_none());

        let seeding = FileStore::new(dir.path().join("b"), true);
        let document = seeding.read().await.unwrap().unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document[0].name, "サンプルユーザー");
        assert_eq!(document[0].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("data"), false);

        store.write(&vec![ChatRoom::new("Alice", false)]).await.unwrap();
        let back = store.read().await.unwrap().unwrap();
        assert_eq!(back[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_a_reseed() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), true);
        tokio::fs::write(store.document_path(), "{ not json").await.unwrap();

        assert!(store.read().await.is_err());
        // the garbled file must survive for manual recovery
        let raw = tokio::fs::read_to_string(store.document_path()).await.unwrap();
        assert_eq!(raw, "{ not json");
    }

    #[test]
    fn test_seed_document_invariants() {
        let document = seed_document();
        let room = &document[0];
        assert_eq!(room.participants[0].name, LOCAL_USER_NAME);
        assert_eq!(room.last_message.as_deref(), room.messages.last().map(|m| m.text.as_str()));
    }
}
