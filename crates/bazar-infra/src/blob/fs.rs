//! Filesystem blob store - keeps listing images and avatars under a
//! local upload directory and serves them from a public base URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use bazar_core::ports::{BlobError, BlobStore};

/// Blob store backed by a local directory.
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let root = std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string());
        let base_url = std::env::var("UPLOADS_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/uploads".to_string());
        Self::new(root, base_url)
    }

    /// Paths come from request data; anything that would escape the
    /// upload root is rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(BlobError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobError> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Io(e.to_string()))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| BlobError::Io(e.to_string()))?;

        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError> {
        for path in paths {
            let target = match self.resolve(path) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(blob_path = %path, error = %e, "Skipping invalid blob path");
                    continue;
                }
            };
            match tokio::fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    // Best-effort: orphaned blobs are tolerable, a failed
                    // delete must not fail the caller's operation.
                    tracing::warn!(blob_path = %path, error = %e, "Failed to remove blob");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> FsBlobStore {
        FsBlobStore::new(dir, "http://localhost:8080/uploads/")
    }

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = std::env::temp_dir().join(format!("bazar-blob-{}", uuid::Uuid::new_v4()));
        let blob = store(&dir);

        let url = blob.put("u1/l1/0.jpg", b"jpeg bytes").await.unwrap();

        assert_eq!(url, "http://localhost:8080/uploads/u1/l1/0.jpg");
        let written = tokio::fs::read(dir.join("u1/l1/0.jpg")).await.unwrap();
        assert_eq!(written, b"jpeg bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_paths_are_rejected() {
        let dir = std::env::temp_dir().join(format!("bazar-blob-{}", uuid::Uuid::new_v4()));
        let blob = store(&dir);

        let result = blob.put("../outside.jpg", b"nope").await;
        assert!(matches!(result, Err(BlobError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_remove_is_best_effort() {
        let dir = std::env::temp_dir().join(format!("bazar-blob-{}", uuid::Uuid::new_v4()));
        let blob = store(&dir);

        blob.put("u1/l1/0.jpg", b"img").await.unwrap();
        blob.remove(&[
            "u1/l1/0.jpg".to_string(),
            "u1/l1/missing.jpg".to_string(),
        ])
        .await
        .unwrap();

        assert!(!dir.join("u1/l1/0.jpg").exists());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
