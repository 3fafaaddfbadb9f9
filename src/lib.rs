//! linemock - Main Library
//!
//! linemock is the data layer of a single-user, LINE-styled chat
//! mock/editor: an operator scripts fake conversations (messages, avatars,
//! read receipts, date separators) and the library keeps the resulting
//! chat-room document durable across a swappable persistence chain.
//!
//! # Overview
//!
//! The crate provides:
//! - An axum HTTP server exposing the chat-room document and upload
//!   endpoints, backed by an ordered chain of document stores
//!   (Postgres when configured, local file fallback otherwise)
//! - An operator-side client store owning the in-memory document, with
//!   optimistic conflict detection before every save, a local cache
//!   fast path, and a multi-destination emergency backup system
//!
//! # Module Structure
//!
//! - **`shared`** - Types used by both server and client
//!   - Chat-room document model, avatar settings, backup records
//!   - Shared error types and client configuration
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server with chat-data and upload handlers
//!   - Document store chain with per-attempt outcome recording
//!
//! - **`client`** - Operator-side state owner
//!   - `ChatStore` with load/save/conflict/CRUD operations
//!   - Emergency backup manager (ring file, SQLite store, remote gist)

pub mod shared;
pub mod backend;
pub mod client;
