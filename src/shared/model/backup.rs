//! Emergency Backup Record
//!
//! A timestamped snapshot of the whole chat-room document. The timestamp
//! doubles as the dedup key when records from multiple stores are merged.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::room::ChatRoom;

/// Format version written into every record
pub const BACKUP_FORMAT_VERSION: &str = "1.0";

/// One snapshot of the document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupRecord {
    /// Snapshot time as an RFC3339 string; also the dedup key
    pub timestamp: String,
    /// The full chat-room document at snapshot time
    pub data: Vec<ChatRoom>,
    /// Backup format version
    pub version: String,
}

impl BackupRecord {
    /// Snapshot the given document now
    pub fn snapshot(data: &[ChatRoom]) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            data: data.to_vec(),
            version: BACKUP_FORMAT_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_carries_version() {
        let record = BackupRecord::snapshot(&[]);
        assert_eq!(record.version, BACKUP_FORMAT_VERSION);
        assert!(record.timestamp.contains('T'));
    }

    #[test]
    fn test_record_round_trip() {
        let record = BackupRecord::snapshot(&[ChatRoom::new("Alice", false)]);
        let json = serde_json::to_string(&record).unwrap();
        let back: BackupRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
