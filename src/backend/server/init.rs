/**
 * Server Initialization
 *
 * This module handles the setup of the Axum HTTP server: building the
 * storage chain from configuration and wiring the router.
 *
 * # Initialization Process
 *
 * 1. Resolve configuration (durable backend credentials, data directory)
 * 2. Build the fallback chain - durable store first when present, the
 *    local file store always last
 * 3. Create the upload bucket under the data directory
 * 4. Create and configure the router
 *
 * # Seeding
 *
 * The file store seeds the sample conversation only when it is the
 * primary store. Behind a durable backend it acts as a plain fallback and
 * must never invent data.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_config, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::storage::{DocumentStore, FallbackChain, FileStore};
use crate::backend::upload::UploadBucket;

/// Create and configure the Axum application from the environment
pub async fn create_app() -> Router<()> {
    create_app_with(load_config().await)
}

/// Create the application from an explicit configuration.
///
/// Tests call this with `ServerConfig::file_only(tempdir)`.
pub fn create_app_with(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing linemock server");

    let mut stores = Vec::new();
    let has_durable = config.durable.is_some();
    if let Some(durable) = config.durable {
        stores.push(DocumentStore::Postgres(durable));
    }
    // the file store seeds defaults only when it is the primary
    stores.push(DocumentStore::File(FileStore::new(
        config.data_dir.clone(),
        !has_durable,
    )));

    let chain = FallbackChain::new(stores);
    tracing::info!(stores = ?chain.store_names(), "document store chain configured");

    let uploads = UploadBucket::new(config.data_dir.join("uploads"));

    let state = AppState {
        storage: Arc::new(chain),
        uploads: Arc::new(uploads),
    };

    create_router(state)
}
