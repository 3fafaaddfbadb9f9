//! Remote Gist Backup
//!
//! Best-effort upload of backup records to an anonymous gist endpoint.
//! Uploads run fire-and-forget on a spawned task; a success appends the
//! gist URL to a local side index. This store is write-only - nothing in
//! the restore path ever reads a gist back.

use std::path::PathBuf;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::shared::BackupRecord;

/// One entry of the URL side index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GistIndexEntry {
    /// Public URL of the uploaded gist
    pub url: String,
    /// Timestamp of the record the gist holds
    pub timestamp: String,
}

/// Fire-and-forget gist uploader
#[derive(Debug, Clone)]
pub struct GistUploader {
    client: Client,
    endpoint: String,
    index_path: PathBuf,
}

impl GistUploader {
    /// Create an uploader against the given endpoint
    pub fn new(endpoint: impl Into<String>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            index_path: index_path.into(),
        }
    }

    /// Upload the record on a background task; failures are logged only
    pub fn spawn_upload(&self, record: BackupRecord) {
        let uploader = self.clone();
        tokio::spawn(async move {
            if let Err(err) = uploader.upload(record).await {
                tracing::warn!(error = %err, "gist backup failed");
            }
        });
    }

    async fn upload(&self, record: BackupRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let content = serde_json::to_string_pretty(&record)?;
        let body = serde_json::json!({
            "description": format!("linemock backup {}", record.timestamp),
            "public": false,
            "files": {
                "backup.json": { "content": content }
            }
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(format!("gist endpoint returned {}", response.status()).into());
        }

        let gist: serde_json::Value = response.json().await?;
        if let Some(url) = gist.get("html_url").and_then(|u| u.as_str()) {
            tracing::info!(url, "backup saved to gist");
            self.append_index(GistIndexEntry {
                url: url.to_string(),
                timestamp: record.timestamp,
            })
            .await?;
        }
        Ok(())
    }

    async fn append_index(
        &self,
        entry: GistIndexEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries: Vec<GistIndexEntry> =
            match tokio::fs::read_to_string(&self.index_path).await {
                Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
                Err(_) => Vec::new(),
            };
        entries.insert(0, entry);

        if let Some(parent) = self.index_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.index_path, serde_json::to_string(&entries)?).await?;
        Ok(())
    }
}
