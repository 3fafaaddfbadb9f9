//! Client Module
//!
//! The operator-side state owner. `ChatStore` holds the in-memory
//! chat-room document and performs every load, save, conflict check and
//! CRUD operation; `BackupManager` writes the emergency backups the store
//! takes before risky saves.
//!
//! All storage locations come from one `ClientConfig` instance; nothing in
//! this module touches module-level state.

pub mod api;
pub mod backup;
pub mod cache;
pub mod error;
pub mod store;

pub use api::RemoteApi;
pub use backup::BackupManager;
pub use cache::LocalCache;
pub use error::ClientError;
pub use store::{ChatStore, ConflictChoice, SaveOutcome};
