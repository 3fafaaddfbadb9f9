//! Client configuration module
//!
//! One explicit configuration object per client instance. Storage locations
//! and the backup endpoint live here instead of module-level constants, so a
//! client can be constructed against a temp directory in tests and torn down
//! cleanly.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default autosave interval (the original saved every two minutes)
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(120);

/// Anonymous gist endpoint used for the remote emergency backup
pub const GITHUB_GISTS_URL: &str = "https://api.github.com/gists";

/// Operator client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the chat-data server, e.g. `http://127.0.0.1:3000`
    pub server_url: String,
    /// Directory holding the local cache, the backup ring file and the
    /// SQLite backup store
    pub data_dir: PathBuf,
    /// Remote backup endpoint; `None` disables the remote store
    pub gist_endpoint: Option<String>,
    /// Interval of the background autosave task
    pub autosave_interval: Duration,
}

impl ClientConfig {
    /// Create a new ClientConfigBuilder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Path of the fast-path cache file (localStorage equivalent)
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("chat-rooms.json")
    }

    /// Path of the emergency-backup ring file
    pub fn backup_ring_path(&self) -> PathBuf {
        self.data_dir.join("emergency-backups.json")
    }

    /// Path of the remote-backup URL index
    pub fn gist_index_path(&self) -> PathBuf {
        self.data_dir.join("gist-urls.json")
    }

    /// Path of the SQLite backup store
    pub fn backup_db_path(&self) -> PathBuf {
        self.data_dir.join("backups.db")
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    server_url: Option<String>,
    data_dir: Option<PathBuf>,
    gist_endpoint: Option<String>,
    autosave_interval: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the server URL (required)
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the client data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Enable the remote backup store with the given endpoint
    pub fn gist_endpoint(mut self, url: impl Into<String>) -> Self {
        self.gist_endpoint = Some(url.into());
        self
    }

    /// Set the autosave interval
    pub fn autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = Some(interval);
        self
    }

    /// Build the configuration
    ///
    /// The data directory defaults to the platform data dir
    /// (`~/.local/share/linemock` on Linux), falling back to the system
    /// temp dir when no data dir is available.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let server_url = self.server_url.ok_or(ConfigError::MissingValue("server_url"))?;
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(server_url));
        }
        let data_dir = self.data_dir.unwrap_or_else(default_data_dir);

        Ok(ClientConfig {
            server_url,
            data_dir,
            gist_endpoint: self.gist_endpoint,
            autosave_interval: self.autosave_interval.unwrap_or(DEFAULT_AUTOSAVE_INTERVAL),
        })
    }
}

fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("linemock");
    path
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
