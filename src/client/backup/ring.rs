//! Ring-File Backup Store
//!
//! All records live in one JSON array, newest first, capped at a fixed
//! count. Read failures yield the empty list so a corrupt ring never
//! blocks a new backup from being written.

use std::path::PathBuf;

use crate::client::error::ClientError;
use crate::shared::BackupRecord;

/// Capped newest-first backup file
#[derive(Debug)]
pub struct RingFile {
    path: PathBuf,
    capacity: usize,
}

impl RingFile {
    /// Create a ring at the given path with the given capacity
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    /// All records currently in the ring, newest first
    pub async fn read_all(&self) -> Vec<BackupRecord> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %err, "failed to read backup ring");
                }
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to parse backup ring");
                Vec::new()
            }
        }
    }

    /// Prepend a record, truncating to capacity
    pub async fn push(&self, record: &BackupRecord) -> Result<(), ClientError> {
        let mut records = self.read_all().await;
        records.insert(0, record.clone());
        records.truncate(self.capacity);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string(&records)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ring_caps_at_capacity_newest_first() {
        let dir = TempDir::new().unwrap();
        let ring = RingFile::new(dir.path().join("ring.json"), 3);

        for i in 0..5 {
            let mut record = BackupRecord::snapshot(&[]);
            record.timestamp = format!("2026-08-30T00:00:0{}Z", i);
            ring.push(&record).await.unwrap();
        }

        let records = ring.read_all().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, "2026-08-30T00:00:04Z");
        assert_eq!(records[2].timestamp, "2026-08-30T00:00:02Z");
    }

    #[tokio::test]
    async fn test_corrupt_ring_reads_empty_and_recovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring.json");
        tokio::fs::write(&path, "garbage").await.unwrap();

        let ring = RingFile::new(&path, 10);
        assert!(ring.read_all().await.is_empty());

        ring.push(&BackupRecord::snapshot(&[])).await.unwrap();
        assert_eq!(ring.read_all().await.len(), 1);
    }
}
