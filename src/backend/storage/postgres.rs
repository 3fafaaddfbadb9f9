/**
 * Postgres Document Store
 *
 * Durable backend holding the whole chat-room document as one JSONB row.
 * The table name comes from configuration, so a hosted database can be
 * shared between installations; it is validated before ever reaching SQL
 * because table names cannot be bound as parameters.
 *
 * # Schema
 *
 * ```sql
 * CREATE TABLE IF NOT EXISTS <table> (
 *     id INTEGER PRIMARY KEY CHECK (id = 1),
 *     data JSONB NOT NULL,
 *     updated_at TIMESTAMPTZ NOT NULL
 * )
 * ```
 *
 * Writes are a single upsert (`ON CONFLICT (id) DO UPDATE`), last writer
 * wins. A missing row is "not found", never an invitation to seed.
 */

use sqlx::{PgPool, Row};

use crate::backend::error::BackendError;
use crate::shared::{ChatRoomDocument, SharedError};

/// Postgres-backed document store
#[derive(Debug)]
pub struct PostgresStore {
    pool: PgPool,
    table: String,
}

impl PostgresStore {
    /// Create a store over an existing pool.
    ///
    /// Fails when the table name contains anything beyond
    /// `[A-Za-z0-9_]` - it is interpolated into SQL.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, BackendError> {
        let table = table.into();
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(SharedError::validation(
                "table",
                format!("invalid table name '{}'", table),
            )
            .into());
        }
        Ok(Self { pool, table })
    }

    /// Create the document table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), BackendError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Read the document row; `Ok(None)` when the row does not exist
    pub async fn read(&self) -> Result<Option<ChatRoomDocument>, BackendError> {
        let sql = format!("SELECT data FROM {} WHERE id = 1", self.table);
        let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let data: serde_json::Value = row.try_get("data")?;
                let document = serde_json::from_value(data)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    /// Upsert the document row
    pub async fn write(&self, document: &ChatRoomDocument) -> Result<(), BackendError> {
        let sql = format!(
            "INSERT INTO {} (id, data, updated_at)
             VALUES (1, $1, NOW())
             ON CONFLICT (id) DO UPDATE SET
                 data = EXCLUDED.data,
                 updated_at = EXCLUDED.updated_at",
            self.table
        );
        let data = serde_json::to_value(document)?;
        sqlx::query(&sql).bind(data).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_table_name_validation() {
        // connect_lazy never touches the network, good enough for ctor tests
        let pool = PgPool::connect_lazy("postgres://localhost/linemock").unwrap();

        assert!(PostgresStore::new(pool.clone(), "chat_documents").is_ok());
        assert!(PostgresStore::new(pool.clone(), "").is_err());
        assert!(PostgresStore::new(pool.clone(), "docs; DROP TABLE users").is_err());
        assert!(PostgresStore::new(pool, "chat-documents").is_err());
    }
}
