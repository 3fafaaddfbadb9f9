//! Avatar Settings
//!
//! Describes a CSS-style background-image crop (URL plus scale and
//! position), never binary image data. Documents uploaded by older client
//! revisions occasionally contain garbled entries, so the server sanitizes
//! these before persisting.

use serde::{Deserialize, Serialize};

/// Lower bound of the avatar zoom factor
pub const MIN_SCALE: f64 = 0.5;
/// Upper bound of the avatar zoom factor
pub const MAX_SCALE: f64 = 3.0;

/// Crop settings for a participant or message avatar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSettings {
    /// Image URL (typically a `/uploads/...` path returned by the server)
    #[serde(default)]
    pub url: String,
    /// Zoom factor, 1.0 = 100%
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Horizontal crop position, 0-100%
    #[serde(default = "default_position")]
    pub position_x: f64,
    /// Vertical crop position, 0-100%
    #[serde(default = "default_position")]
    pub position_y: f64,
}

fn default_scale() -> f64 {
    1.0
}

fn default_position() -> f64 {
    50.0
}

impl AvatarSettings {
    /// Create settings for a URL with neutral crop values
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scale: default_scale(),
            position_x: default_position(),
            position_y: default_position(),
        }
    }

    /// Sanitize a possibly garbled entry.
    ///
    /// An entry without a URL carries no usable information and is dropped
    /// entirely; anything else keeps its URL with scale and positions
    /// clamped into their valid ranges.
    pub fn sanitized(self) -> Option<Self> {
        if self.url.trim().is_empty() {
            return None;
        }
        Some(Self {
            url: self.url,
            scale: self.scale.clamp(MIN_SCALE, MAX_SCALE),
            position_x: self.position_x.clamp(0.0, 100.0),
            position_y: self.position_y.clamp(0.0, 100.0),
        })
    }
}

/// Sanitize an optional settings entry in place
pub fn sanitize_in_place(settings: &mut Option<AvatarSettings>) {
    if let Some(current) = settings.take() {
        *settings = current.sanitized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_is_dropped() {
        let garbled = AvatarSettings {
            url: "  ".to_string(),
            scale: 2.0,
            position_x: 10.0,
            position_y: 10.0,
        };
        assert_eq!(garbled.sanitized(), None);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = AvatarSettings {
            url: "/uploads/avatars/a.png".to_string(),
            scale: 9.0,
            position_x: -5.0,
            position_y: 250.0,
        };
        let sanitized = settings.sanitized().unwrap();
        assert_eq!(sanitized.scale, MAX_SCALE);
        assert_eq!(sanitized.position_x, 0.0);
        assert_eq!(sanitized.position_y, 100.0);
    }

    #[test]
    fn test_deserialize_entry_lacking_url() {
        // Older clients sometimes persisted `{"scale":1.5}` style fragments
        let settings: AvatarSettings = serde_json::from_str(r#"{"scale":1.5}"#).unwrap();
        assert_eq!(settings.url, "");
        assert_eq!(settings.sanitized(), None);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let settings = AvatarSettings::new("/uploads/avatars/a.png");
        let json = serde_json::to_value(&settings).unwrap();
        assert!(json.get("positionX").is_some());
        assert!(json.get("positionY").is_some());
    }
}
