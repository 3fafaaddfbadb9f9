//! Client Error Types
//!
//! Failures the operator client can hit: transport, serialization, local
//! I/O and the SQLite backup store. Degraded-but-successful outcomes
//! (save fell back to the local cache, conflict detected) are not errors;
//! they are reported through `SaveOutcome`.

use thiserror::Error;

use crate::shared::config::ConfigError;
use crate::shared::SharedError;

/// Operator client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server rejected request with status {status}")]
    ServerRejected {
        /// HTTP status code the server returned
        status: u16,
    },

    /// JSON serialization or deserialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local cache or backup file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite backup store failure
    #[error("backup store error: {0}")]
    BackupStore(#[from] sqlx::Error),

    /// Configuration failure
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shared validation/document failure
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// Save failed on every destination, including the local cache
    #[error("データの保存に失敗しました。")]
    SaveFailedEverywhere,
}
