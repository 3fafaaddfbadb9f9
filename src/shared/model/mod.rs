//! Chat-Room Document Model
//!
//! The single mutable JSON document this whole system revolves around: an
//! ordered list of chat rooms, each carrying its participants and scripted
//! messages. Field names serialize in camelCase to stay wire-compatible
//! with documents produced by earlier installations.

pub mod avatar;
pub mod backup;
pub mod message;
pub mod room;

pub use avatar::AvatarSettings;
pub use backup::{BackupRecord, BACKUP_FORMAT_VERSION};
pub use message::Message;
pub use room::{ChatRoom, Participant, RoomPatch};

/// The persisted document: all chat rooms of the installation, in order
pub type ChatRoomDocument = Vec<ChatRoom>;

/// Display name of the local user, always `participants[0]`
pub const LOCAL_USER_NAME: &str = "あなた";

/// Fallback display name when a counterpart has no participant entry
pub const UNKNOWN_USER_NAME: &str = "ユーザー";
