/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration,
 * focusing on the optional durable database backend.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables. The durable backend
 * is selected only when BOTH of its credentials are present:
 *
 * - `LINEMOCK_DB_URL` - Postgres connection string
 * - `LINEMOCK_DB_TABLE` - table holding the document row
 *
 * When either is missing, or connecting fails, the server runs on the
 * local file store alone.
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 */

use std::path::PathBuf;

use sqlx::PgPool;

use crate::backend::storage::PostgresStore;

/// Environment variable holding the Postgres connection string
pub const ENV_DB_URL: &str = "LINEMOCK_DB_URL";
/// Environment variable holding the document table name
pub const ENV_DB_TABLE: &str = "LINEMOCK_DB_TABLE";

/// Resolved server configuration
#[derive(Debug)]
pub struct ServerConfig {
    /// Directory for the file store and the upload bucket
    pub data_dir: PathBuf,
    /// Durable backend, when credentials were present and usable
    pub durable: Option<PostgresStore>,
}

impl ServerConfig {
    /// Configuration without a durable backend, rooted at `data_dir`.
    /// This is what integration tests construct against a temp dir.
    pub fn file_only(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            durable: None,
        }
    }
}

/// Load configuration from the environment
///
/// The data directory is the working-directory `data` folder, matching
/// where earlier installations kept their document file.
pub async fn load_config() -> ServerConfig {
    ServerConfig {
        data_dir: PathBuf::from("data"),
        durable: load_durable_store().await,
    }
}

/// Load and initialize the durable document store
///
/// # Returns
///
/// - `Some(PostgresStore)` when both credentials are present, the pool
///   connects, and the schema is in place
/// - `None` otherwise; the server continues on the file store
pub async fn load_durable_store() -> Option<PostgresStore> {
    let url = match std::env::var(ENV_DB_URL) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("{} not set. Durable backend disabled.", ENV_DB_URL);
            return None;
        }
    };
    let table = match std::env::var(ENV_DB_TABLE) {
        Ok(table) => table,
        Err(_) => {
            tracing::warn!("{} not set. Durable backend disabled.", ENV_DB_TABLE);
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Durable backend disabled.");
            return None;
        }
    };

    let store = match PostgresStore::new(pool, table) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Rejected durable backend configuration: {}", e);
            return None;
        }
    };

    match store.init_schema().await {
        Ok(()) => {
            tracing::info!("Durable backend ready");
            Some(store)
        }
        Err(e) => {
            tracing::error!("Failed to initialize document table: {:?}", e);
            tracing::warn!("Durable backend disabled.");
            None
        }
    }
}
