//! SQLite Backup Store
//!
//! Structured local store for backup records, keyed by timestamp. Records
//! are kept forever; no eviction is implemented, mirroring the behavior
//! of the store this replaces.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;

use crate::client::error::ClientError;
use crate::shared::BackupRecord;

/// Timestamp-keyed backup database
#[derive(Debug)]
pub struct BackupDatabase {
    pool: SqlitePool,
}

impl BackupDatabase {
    /// Open or create the backup database at the given path
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), ClientError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS backups (
                timestamp TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                version TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace a record under its timestamp key
    pub async fn put(&self, record: &BackupRecord) -> Result<(), ClientError> {
        let data = serde_json::to_string(&record.data)?;
        sqlx::query(
            "INSERT OR REPLACE INTO backups (timestamp, data, version)
             VALUES (?, ?, ?)",
        )
        .bind(&record.timestamp)
        .bind(&data)
        .bind(&record.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All stored records; malformed rows are skipped
    pub async fn get_all(&self) -> Result<Vec<BackupRecord>, ClientError> {
        let rows = sqlx::query("SELECT timestamp, data, version FROM backups")
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let timestamp: String = row.try_get("timestamp")?;
            let data: String = row.try_get("data")?;
            let version: String = row.try_get("version")?;

            match serde_json::from_str(&data) {
                Ok(data) => records.push(BackupRecord {
                    timestamp,
                    data,
                    version,
                }),
                Err(err) => {
                    tracing::warn!(timestamp = %timestamp, error = %err, "skipping malformed backup row");
                }
            }
        }
        Ok(records)
    }

    /// Number of stored records, for diagnostics
    pub async fn count(&self) -> Result<u64, ClientError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM backups")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ChatRoom;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_and_get_all() {
        let dir = TempDir::new().unwrap();
        let db = BackupDatabase::open(dir.path().join("backups.db")).await.unwrap();

        let record = BackupRecord::snapshot(&[ChatRoom::new("Alice", false)]);
        db.put(&record).await.unwrap();

        let records = db.get_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_same_timestamp_replaces() {
        let dir = TempDir::new().unwrap();
        let db = BackupDatabase::open(dir.path().join("backups.db")).await.unwrap();

        let mut record = BackupRecord::snapshot(&[]);
        record.timestamp = "2026-08-30T00:00:00Z".to_string();
        db.put(&record).await.unwrap();

        record.data = vec![ChatRoom::new("Alice", false)];
        db.put(&record).await.unwrap();

        let records = db.get_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_row_is_skipped() {
        let dir = TempDir::new().unwrap();
        let db = BackupDatabase::open(dir.path().join("backups.db")).await.unwrap();

        sqlx::query("INSERT INTO backups (timestamp, data, version) VALUES (?, ?, ?)")
            .bind("2026-08-30T00:00:00Z")
            .bind("not json")
            .bind("1.0")
            .execute(&db.pool)
            .await
            .unwrap();

        assert!(db.get_all().await.unwrap().is_empty());
    }
}
