/**
 * Document Storage
 *
 * The chat-room document lives in exactly one JSON blob per installation.
 * This module provides the stores that can hold that blob and the ordered
 * fallback chain the handlers talk to.
 *
 * # Stores
 *
 * - `PostgresStore` - durable backend, single-row upsert into a configured
 *   table; selected only when its two credentials are present
 * - `FileStore` - working-directory `data/chat-rooms.json`; always last in
 *   the chain and the only store allowed to seed defaults
 *
 * # Fallback Chain
 *
 * Stores are tried in order. Instead of nested catch blocks, every try is
 * recorded as a `StoreAttempt` so tests (and logs) can see exactly which
 * store served or swallowed a request.
 *
 * # Seeding Rule
 *
 * A durable backend that reports "not found" yields the empty document and
 * is NEVER written to as a side effect of a read. Re-seeding a durable
 * backend on a transient "not found" has destroyed user data before; only
 * the local file store seeds, and only on its own first access.
 */

pub mod file;
pub mod postgres;

pub use file::FileStore;
pub use postgres::PostgresStore;

use crate::backend::error::BackendError;
use crate::shared::ChatRoomDocument;

/// One store that can hold the document
#[derive(Debug)]
pub enum DocumentStore {
    /// Durable Postgres backend
    Postgres(PostgresStore),
    /// Local file fallback
    File(FileStore),
}

impl DocumentStore {
    /// Store name used in attempt records and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::File(_) => "file",
        }
    }

    /// Read the document; `Ok(None)` means the store holds no document yet
    pub async fn read(&self) -> Result<Option<ChatRoomDocument>, BackendError> {
        match self {
            Self::Postgres(store) => store.read().await,
            Self::File(store) => store.read().await,
        }
    }

    /// Persist the document
    pub async fn write(&self, document: &ChatRoomDocument) -> Result<(), BackendError> {
        match self {
            Self::Postgres(store) => store.write(document).await,
            Self::File(store) => store.write(document).await,
        }
    }
}

/// Outcome of one store try within a chain operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAttempt {
    /// Name of the store that was tried
    pub store: &'static str,
    /// What the try produced
    pub outcome: AttemptOutcome,
}

/// What a single store try produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The store served the request
    Served,
    /// The store holds no document (durable backends stop the chain here)
    NotFound,
    /// The store failed; the chain moved on
    Failed(String),
}

/// Result of a chain read: the document plus the attempt trail
#[derive(Debug)]
pub struct ChainRead {
    pub document: ChatRoomDocument,
    pub attempts: Vec<StoreAttempt>,
}

/// Result of a chain write: the attempt trail (at least one `Served`)
#[derive(Debug)]
pub struct ChainWrite {
    pub attempts: Vec<StoreAttempt>,
}

/// Ordered list of stores tried in sequence
#[derive(Debug)]
pub struct FallbackChain {
    stores: Vec<DocumentStore>,
}

impl FallbackChain {
    /// Build a chain from the stores in priority order
    pub fn new(stores: Vec<DocumentStore>) -> Self {
        debug_assert!(!stores.is_empty());
        Self { stores }
    }

    /// Names of the configured stores, in order
    pub fn store_names(&self) -> Vec<&'static str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    /// Read the document, falling through the chain on store errors.
    ///
    /// A store that succeeds but holds no document ends the read with the
    /// empty document: "not found" on a healthy store is an answer, not a
    /// failure, and falling through would invite the re-seeding bug.
    pub async fn read(&self) -> Result<ChainRead, BackendError> {
        let mut attempts = Vec::new();

        for store in &self.stores {
            match store.read().await {
                Ok(Some(document)) => {
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        outcome: AttemptOutcome::Served,
                    });
                    return Ok(ChainRead { document, attempts });
                }
                Ok(None) => {
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        outcome: AttemptOutcome::NotFound,
                    });
                    return Ok(ChainRead {
                        document: Vec::new(),
                        attempts,
                    });
                }
                Err(err) => {
                    tracing::warn!(store = store.name(), error = %err, "document read failed, trying next store");
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        outcome: AttemptOutcome::Failed(err.to_string()),
                    });
                }
            }
        }

        let trail = Self::describe(&attempts);
        Err(BackendError::storage("Failed to read data", Some(trail)))
    }

    /// Write the document to the first store that accepts it
    pub async fn write(&self, document: &ChatRoomDocument) -> Result<ChainWrite, BackendError> {
        let mut attempts = Vec::new();

        for store in &self.stores {
            match store.write(document).await {
                Ok(()) => {
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        outcome: AttemptOutcome::Served,
                    });
                    return Ok(ChainWrite { attempts });
                }
                Err(err) => {
                    tracing::warn!(store = store.name(), error = %err, "document write failed, trying next store");
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        outcome: AttemptOutcome::Failed(err.to_string()),
                    });
                }
            }
        }

        let trail = Self::describe(&attempts);
        Err(BackendError::storage("Failed to save data", Some(trail)))
    }

    fn describe(attempts: &[StoreAttempt]) -> String {
        attempts
            .iter()
            .map(|attempt| match &attempt.outcome {
                AttemptOutcome::Served => format!("{}: ok", attempt.store),
                AttemptOutcome::NotFound => format!("{}: not found", attempt.store),
                AttemptOutcome::Failed(err) => format!("{}: {}", attempt.store, err),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_chain_read_seeds_file_store() {
        let dir = TempDir::new().unwrap();
        let chain = FallbackChain::new(vec![DocumentStore::File(FileStore::new(
            dir.path().join("data"),
            true,
        ))]);

        let read = chain.read().await.unwrap();
        assert_eq!(read.attempts.len(), 1);
        assert_eq!(read.attempts[0].outcome, AttemptOutcome::Served);
        assert!(!read.document.is_empty());
    }

    #[tokio::test]
    async fn test_chain_write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let chain = FallbackChain::new(vec![DocumentStore::File(FileStore::new(
            dir.path().join("data"),
            false,
        ))]);

        let document = vec![crate::shared::ChatRoom::new("Alice", false)];
        let write = chain.write(&document).await.unwrap();
        assert_eq!(write.attempts[0].outcome, AttemptOutcome::Served);

        let read = chain.read().await.unwrap();
        assert_eq!(read.document, document);
    }

    #[tokio::test]
    async fn test_non_seeding_store_not_found_yields_empty_document() {
        let dir = TempDir::new().unwrap();
        let chain = FallbackChain::new(vec![DocumentStore::File(FileStore::new(
            dir.path().join("data"),
            false,
        ))]);

        let read = chain.read().await.unwrap();
        assert!(read.document.is_empty());
        assert_eq!(read.attempts[0].outcome, AttemptOutcome::NotFound);
        // and the read must not have created the file
        assert!(!dir.path().join("data").join("chat-rooms.json").exists());
    }
}
