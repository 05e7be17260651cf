//! Artifact store
//!
//! Filesystem namespace for split results: one subdirectory per request
//! identifier, holding that request's page files. The directory's
//! modification time doubles as the artifact set's creation timestamp, so
//! expiry needs no bookkeeping beyond the filesystem itself.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{AppError, Result};

/// Filesystem-backed artifact store
#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage root if it does not exist yet.
    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Claim a fresh namespace for a request identifier.
    ///
    /// Returns `Ok(false)` if the identifier is already taken, letting the
    /// caller regenerate instead of clobbering another request's artifacts.
    pub async fn create_namespace(&self, id: &str) -> Result<bool> {
        if !is_safe_component(id) {
            return Err(AppError::InvalidInput(format!(
                "Invalid request identifier: {id:?}"
            )));
        }
        match tokio::fs::create_dir(self.namespace_dir(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Write one artifact file into an identifier's namespace.
    ///
    /// Storage failures are fatal for the request and propagate as `Io`.
    pub async fn put(&self, id: &str, filename: &str, bytes: &[u8]) -> Result<()> {
        if !is_safe_component(id) || !is_safe_component(filename) {
            return Err(AppError::InvalidInput(format!(
                "Invalid artifact path: {id:?}/{filename:?}"
            )));
        }
        tokio::fs::write(self.namespace_dir(id).join(filename), bytes).await?;
        Ok(())
    }

    /// Read one artifact back for serving.
    ///
    /// Absent, expired, or traversal-shaped paths all resolve to `NotFound`;
    /// a purge racing this read is indistinguishable from expiry.
    pub async fn resolve(&self, id: &str, filename: &str) -> Result<Vec<u8>> {
        if !is_safe_component(id) || !is_safe_component(filename) {
            return Err(AppError::NotFound(format!("{id}/{filename}")));
        }
        match tokio::fs::read(self.namespace_dir(id).join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("{id}/{filename}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List identifiers whose artifacts have outlived the retention window.
    ///
    /// An artifact set aged exactly `retention` counts as expired.
    pub async fn list_expired(
        &self,
        now: SystemTime,
        retention: Duration,
    ) -> Result<Vec<String>> {
        let mut expired = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_dir() => m,
                // Stray files in the root and entries deleted mid-scan are
                // not artifact sets.
                _ => continue,
            };
            let created = metadata.modified()?;
            let is_expired = now
                .duration_since(created)
                .map_or(false, |age| age >= retention);
            if is_expired {
                expired.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        Ok(expired)
    }

    /// Delete an identifier's entire namespace. Idempotent.
    pub async fn purge(&self, id: &str) -> Result<()> {
        if !is_safe_component(id) {
            return Ok(());
        }
        match tokio::fs::remove_dir_all(self.namespace_dir(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A path component is safe when it cannot escape its directory.
fn is_safe_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (TempDir, ArtifactStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        store.init().await.unwrap();
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_put_resolve_lifecycle() {
        let (_guard, store) = test_store().await;

        assert!(store.create_namespace("abc123").await.unwrap());
        store.put("abc123", "doc_abc123_page_1.pdf", b"%PDF-").await.unwrap();

        let bytes = store.resolve("abc123", "doc_abc123_page_1.pdf").await.unwrap();
        assert_eq!(bytes, b"%PDF-");

        store.purge("abc123").await.unwrap();
        let result = store.resolve("abc123", "doc_abc123_page_1.pdf").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_namespace_collision() {
        let (_guard, store) = test_store().await;

        assert!(store.create_namespace("dup").await.unwrap());
        assert!(!store.create_namespace("dup").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_is_idempotent() {
        let (_guard, store) = test_store().await;

        store.create_namespace("gone").await.unwrap();
        store.purge("gone").await.unwrap();
        // Second purge of an absent namespace must not error
        store.purge("gone").await.unwrap();
        store.purge("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_expired_boundary() {
        let (_guard, store) = test_store().await;

        store.create_namespace("old").await.unwrap();
        store.put("old", "f.pdf", b"x").await.unwrap();

        let now = SystemTime::now();
        let retention = Duration::from_secs(3600);

        // Fresh artifact sets stay out of the expired list
        let fresh = store.list_expired(now, retention).await.unwrap();
        assert!(fresh.is_empty());

        // At or beyond the retention boundary the set is expired
        let later = now + retention + Duration::from_secs(1);
        let expired = store.list_expired(later, retention).await.unwrap();
        assert_eq!(expired, vec!["old".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_isolated() {
        let (_guard, store) = test_store().await;

        store.create_namespace("a").await.unwrap();
        store.create_namespace("b").await.unwrap();

        let (ra, rb) = tokio::join!(
            store.put("a", "page_1.pdf", b"contents-a"),
            store.put("b", "page_1.pdf", b"contents-b"),
        );
        ra.unwrap();
        rb.unwrap();

        assert_eq!(store.resolve("a", "page_1.pdf").await.unwrap(), b"contents-a");
        assert_eq!(store.resolve("b", "page_1.pdf").await.unwrap(), b"contents-b");

        // Purging one identifier leaves the other untouched
        store.purge("a").await.unwrap();
        assert!(store.resolve("a", "page_1.pdf").await.is_err());
        assert!(store.resolve("b", "page_1.pdf").await.is_ok());
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_guard, store) = test_store().await;

        let result = store.resolve("..", "main.rs").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = store.resolve("abc", "../escape.pdf").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
