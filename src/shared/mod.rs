//! Shared Module
//!
//! Types and data structures used by both the server and the operator
//! client. Everything here serializes to the camelCase JSON wire format the
//! chat-room document uses on disk and over HTTP.

/// Chat-room document model
pub mod model;

/// Shared error types
pub mod error;

/// Client configuration
pub mod config;

pub use error::SharedError;
pub use model::{
    AvatarSettings, BackupRecord, ChatRoom, ChatRoomDocument, Message, Participant, RoomPatch,
};
