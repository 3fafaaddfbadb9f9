//! Chat Room Data Structure
//!
//! A chat room holds its participants and the scripted message list.
//! Invariants: `participants[0]` is always the local user; in 1:1 rooms
//! `participants[1]` is the counterpart. Messages keep insertion order,
//! which after manual edits is not necessarily timestamp order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::avatar::{self, AvatarSettings};
use super::message::Message;
use super::{LOCAL_USER_NAME, UNKNOWN_USER_NAME};
use crate::shared::error::SharedError;

/// Someone appearing in a room, including the local user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Participant ID, `"user1"` for the local user
    pub id: String,
    /// Display name
    pub name: String,
    /// Avatar crop, `None` for the default silhouette
    pub avatar_settings: Option<AvatarSettings>,
}

impl Participant {
    /// Create a participant without an avatar
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_settings: None,
        }
    }

    /// The local user, always first in a room's participant list
    pub fn local_user() -> Self {
        Self::new("user1", LOCAL_USER_NAME)
    }
}

/// Represents one chat room of the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    /// Unique room ID, generated as `"room{millis}"`
    pub id: String,
    /// Display name; derived for group chats
    pub name: String,
    /// Preview text of the newest message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    /// Timestamp shown next to the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<DateTime<Utc>>,
    /// Unread badge count
    #[serde(default)]
    pub unread_count: u32,
    /// Whether this is a group chat
    #[serde(default)]
    pub is_group: bool,
    /// Participants; `[0]` is the local user
    pub participants: Vec<Participant>,
    /// Scripted messages in insertion order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ChatRoom {
    /// Create a new room named after its counterpart
    pub fn new(name: impl Into<String>, is_group: bool) -> Self {
        let name = name.into();
        Self {
            id: format!("room{}", Utc::now().timestamp_millis()),
            name: name.clone(),
            last_message: None,
            last_message_time: None,
            unread_count: 0,
            is_group,
            participants: vec![Participant::local_user(), Participant::new("user2", name)],
            messages: Vec::new(),
        }
    }

    /// Derived display name for a group chat of `count` participants
    pub fn group_name(count: usize) -> String {
        format!("グループ ({}人)", count)
    }

    /// Display name of the counterpart in a 1:1 room
    pub fn other_name(&self) -> String {
        self.participants
            .get(1)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
    }

    /// Append a message, updating preview, timestamp and unread count.
    ///
    /// Messages from the counterpart increment the unread badge; the local
    /// user's own messages reset it (the room is open while typing).
    pub fn push_message(&mut self, message: Message) {
        self.last_message = Some(message.text.clone());
        self.last_message_time = Some(message.timestamp);
        self.unread_count = if message.is_user {
            0
        } else {
            self.unread_count + 1
        };
        self.messages.push(message);
    }

    /// Replace the message list from the admin editor and apply an optional
    /// participant patch.
    ///
    /// `last_message_time` is stamped with the current time here, not with
    /// the edited tail message's own timestamp. Inconsistent with
    /// `push_message`, preserved on purpose; see DESIGN.md.
    pub fn apply_update(&mut self, messages: Vec<Message>, patch: Option<RoomPatch>) {
        self.last_message = messages.last().map(|m| m.text.clone());
        self.last_message_time = Some(Utc::now());
        self.messages = messages;

        let Some(patch) = patch else { return };

        self.is_group = patch.is_group;

        if let Some(participants) = patch.participants {
            self.participants = participants;
        } else {
            if !patch.is_group {
                if let Some(name) = &patch.other_user_name {
                    if let Some(other) = self.participants.get_mut(1) {
                        other.name = name.clone();
                    }
                }
            }
            if let Some(settings) = patch.other_avatar {
                if let Some(other) = self.participants.get_mut(1) {
                    other.avatar_settings = settings;
                }
            }
            if let Some(settings) = patch.user_avatar {
                if let Some(local) = self.participants.first_mut() {
                    local.avatar_settings = settings;
                }
            }
        }

        self.name = if self.is_group {
            Self::group_name(self.participants.len())
        } else {
            patch
                .other_user_name
                .unwrap_or_else(|| self.name.clone())
        };
    }

    /// Drop garbled avatar entries from participants and messages
    pub fn sanitize(&mut self) {
        for participant in &mut self.participants {
            avatar::sanitize_in_place(&mut participant.avatar_settings);
        }
        for message in &mut self.messages {
            avatar::sanitize_in_place(&mut message.avatar_settings);
        }
    }
}

/// Closed partial-update structure for `apply_update`.
///
/// Replaces the untyped user-data blobs earlier revisions passed around:
/// every field the admin editor can change is named here and nothing else
/// gets through. `Some(None)` on the avatar fields clears the avatar.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    /// Whether the room is (now) a group chat
    pub is_group: bool,
    /// New display name of the counterpart (1:1 rooms)
    pub other_user_name: Option<String>,
    /// New avatar of the counterpart; `Some(None)` clears it
    pub other_avatar: Option<Option<AvatarSettings>>,
    /// New avatar of the local user; `Some(None)` clears it
    pub user_avatar: Option<Option<AvatarSettings>>,
    /// Full participant list replacement (group editor)
    pub participants: Option<Vec<Participant>>,
}

impl RoomPatch {
    /// Validate the patch before applying it
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(participants) = &self.participants {
            if participants.is_empty() {
                return Err(SharedError::validation(
                    "participants",
                    "participant list replacement must not be empty",
                ));
            }
        }
        if self.is_group && self.participants.is_none() && self.other_user_name.is_some() {
            return Err(SharedError::validation(
                "otherUserName",
                "group chats derive their name from the participant count",
            ));
        }
        Ok(())
    }
}
