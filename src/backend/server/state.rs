/**
 * Application State Management
 *
 * This module defines the application state structure shared by all
 * handlers.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The document storage fallback chain
 * - The upload bucket for avatars and chat images
 *
 * # Thread Safety
 *
 * Both members are wrapped in `Arc`; the chain itself is stateless between
 * requests (the document lives in the stores, not in memory), so no lock
 * is needed here.
 */

use std::sync::Arc;

use crate::backend::storage::FallbackChain;
use crate::backend::upload::UploadBucket;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Ordered document stores (durable first when configured)
    pub storage: Arc<FallbackChain>,
    /// Object bucket for uploaded images
    pub uploads: Arc<UploadBucket>,
}
