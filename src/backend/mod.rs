/**
 * Backend Module
 *
 * Server-side code: the Axum HTTP server exposing the chat-room document
 * and the upload endpoints, backed by the document store chain.
 */

pub mod chat;
pub mod error;
pub mod routes;
pub mod server;
pub mod storage;
pub mod upload;
