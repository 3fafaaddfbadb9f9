//! Chat Message Data Structure
//!
//! One bubble in a scripted conversation. Besides plain text the editor
//! inserts stamps, image messages and date separators; those are all the
//! same struct with optional flags, matching the persisted JSON shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::avatar::AvatarSettings;

/// Represents a scripted chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID (millisecond timestamp string in practice)
    pub id: String,
    /// Message text; display text of the date for separators
    pub text: String,
    /// Whether the local user sent this message
    pub is_user: bool,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
    /// Display name of the sender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Avatar crop of the sender at send time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_settings: Option<AvatarSettings>,
    /// Read receipt; meaningful only for the local user's own messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    /// Sender ID for group chats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// URL for image messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Stamp messages render without bubble chrome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stamp: Option<bool>,
    /// Date separators carry no sender semantics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_date_separator: Option<bool>,
}

impl Message {
    /// Create a plain text message
    pub fn text(
        text: impl Into<String>,
        is_user: bool,
        user_name: Option<String>,
        avatar_settings: Option<AvatarSettings>,
    ) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
            user_name,
            avatar_settings,
            // own messages start out read
            is_read: if is_user { Some(true) } else { None },
            user_id: None,
            image_url: None,
            is_stamp: None,
            is_date_separator: None,
        }
    }

    /// Create an image message
    pub fn image(image_url: impl Into<String>, is_user: bool, user_name: Option<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::text("", is_user, user_name, None)
        }
    }

    /// Create a stamp message
    pub fn stamp(image_url: impl Into<String>, is_user: bool, user_name: Option<String>) -> Self {
        Self {
            is_stamp: Some(true),
            ..Self::image(image_url, is_user, user_name)
        }
    }

    /// Create a date separator, e.g. `"8月30日(日)"`
    pub fn date_separator(label: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            text: label.into(),
            is_user: false,
            timestamp,
            user_name: None,
            avatar_settings: None,
            is_read: None,
            user_id: None,
            image_url: None,
            is_stamp: None,
            is_date_separator: Some(true),
        }
    }

    /// Whether this entry is a date separator rather than a real message
    pub fn is_separator(&self) -> bool {
        self.is_date_separator.unwrap_or(false)
    }
}
