//! Object storage adapter for uploaded binaries (PDFs, inline images).
//!
//! The system delegates binary durability to an object store exposing
//! `put(key, bytes) -> public URL` and `delete(key)`. The default backend
//! writes under a local media root that the HTTP server exposes at
//! `/media`, so every returned URL is publicly resolvable. A bucket-backed
//! implementation slots in behind the same trait.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::DomainError;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key` and return a publicly resolvable URL.
    /// Must not report success before the backend has acknowledged the write.
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, DomainError>;

    /// Delete the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Map a URL previously returned by `put` back to its storage key.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Build a collision-proof storage key: `{prefix}/{uuid}_{filename}`.
/// The filename is reduced to its final path component so client-supplied
/// names cannot point outside the prefix.
pub fn unique_key(prefix: &str, filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or("file");
    format!("{}/{}_{}", prefix, Uuid::new_v4(), name)
}

/// Filesystem storage backend.
pub struct FsObjectStorage {
    root: PathBuf,
    public_base: String,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn media_base(&self) -> String {
        format!("{}/media/", self.public_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, DomainError> {
        let full_path = self.full_path(key);
        tracing::debug!(key = %key, size = data.len(), "storage: put");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Storage(e.to_string()))?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        file.write_all(data)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        drop(file);

        fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        Ok(format!("{}{}", self.media_base(), key))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        fs::remove_file(self.full_path(key))
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.media_base()).map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_read_back_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path(), "http://localhost:8000");

        let url = storage
            .put("course_files/abc_test.pdf", b"%PDF-1.4 payload")
            .await
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:8000/media/course_files/abc_test.pdf"
        );

        let on_disk = std::fs::read(dir.path().join("course_files/abc_test.pdf")).unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 payload");
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path(), "http://localhost:8000");

        storage.put("quill_uploads/x_a.png", b"png").await.unwrap();
        storage.delete("quill_uploads/x_a.png").await.unwrap();
        assert!(!dir.path().join("quill_uploads/x_a.png").exists());
    }

    #[test]
    fn key_for_url_round_trip() {
        let storage = FsObjectStorage::new("/tmp/media", "http://localhost:8000/");
        let key = "course_files/abc_notes.pdf";
        let url = format!("http://localhost:8000/media/{}", key);
        assert_eq!(storage.key_for_url(&url).as_deref(), Some(key));
        assert_eq!(storage.key_for_url("http://elsewhere/media/x"), None);
    }

    #[test]
    fn unique_key_is_collision_proof_and_sanitized() {
        let a = unique_key("quill_uploads", "diagram.png");
        let b = unique_key("quill_uploads", "diagram.png");
        assert_ne!(a, b);
        assert!(a.starts_with("quill_uploads/"));
        assert!(a.ends_with("_diagram.png"));

        let evil = unique_key("quill_uploads", "../../etc/passwd");
        assert!(evil.starts_with("quill_uploads/"));
        assert!(evil.ends_with("_passwd"));
    }
}
