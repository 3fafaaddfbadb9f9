/**
 * Backend Error Module
 *
 * Error types for the HTTP server and their conversion to responses.
 */

pub mod types;
pub mod conversion;

pub use types::BackendError;
