//! Blob storage port - listing images and avatars live outside the
//! relational store; only their URLs are persisted.

use async_trait::async_trait;

/// Object storage abstraction.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `path` and return the public URL.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobError>;

    /// Public URL for an already-stored path.
    fn public_url(&self, path: &str) -> String;

    /// Remove stored objects. Best-effort: callers treat failures as
    /// loggable, not fatal - orphaned blobs are acceptable, orphaned
    /// listings are not.
    async fn remove(&self, paths: &[String]) -> Result<(), BlobError>;
}

/// Blob storage errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid blob path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),
}
