/**
 * Upload Bucket
 *
 * Local object storage for uploaded images. Objects are keyed
 * `<prefix>/<millis>_<filename>` and served back by the router under
 * `/uploads`, so the returned URL is directly usable in avatar settings
 * and image messages.
 */

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::backend::error::BackendError;

/// A stored object: where it is served and where it lives in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Public URL path, e.g. `/uploads/avatars/1700000000000_a.png`
    pub url: String,
    /// Bucket-relative key, e.g. `avatars/1700000000000_a.png`
    pub path: String,
}

/// Directory-backed object bucket
#[derive(Debug)]
pub struct UploadBucket {
    root: PathBuf,
}

impl UploadBucket {
    /// Create a bucket rooted at `root` (created lazily on first store)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem root of the bucket, for the static-file service
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `bytes` under a timestamp-prefixed key inside `prefix`
    pub async fn store(
        &self,
        prefix: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, BackendError> {
        let key = format!("{}_{}", Utc::now().timestamp_millis(), sanitize_name(file_name));
        let dir = self.root.join(prefix);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&key), bytes).await?;

        let path = format!("{}/{}", prefix, key);
        Ok(StoredObject {
            url: format!("/uploads/{}", path),
            path,
        })
    }
}

/// Keep object keys filesystem- and URL-safe
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_writes_object_and_returns_paths() {
        let dir = TempDir::new().unwrap();
        let bucket = UploadBucket::new(dir.path().join("uploads"));

        let object = bucket.store("avatars", "face.png", b"png-bytes").await.unwrap();
        assert!(object.url.starts_with("/uploads/avatars/"));
        assert!(object.url.ends_with("_face.png"));
        assert_eq!(object.url, format!("/uploads/{}", object.path));

        let on_disk = tokio::fs::read(dir.path().join("uploads").join(&object.path))
            .await
            .unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_name("写真.png"), "__.png");
        assert_eq!(sanitize_name(""), "upload");
    }
}
