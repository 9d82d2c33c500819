use bytes::Bytes;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{DubbingError, DubbingResult};

/// Hands out collision-free paths under one scratch directory.
#[derive(Debug, Clone)]
pub struct TempArtifactStore {
    root: PathBuf,
}

impl TempArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserves a fresh path with `extension`. No file is created yet, but
    /// the guard will remove whatever ends up there.
    pub fn reserve(&self, extension: &str) -> TempArtifact {
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        TempArtifact::new(self.root.join(name))
    }

    /// Writes `data` to a new artifact.
    pub async fn persist(&self, data: &[u8], extension: &str) -> DubbingResult<TempArtifact> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DubbingError::audio_processing(format!("Failed to create temp directory: {}", e))
                .with_detail("error", e.to_string())
        })?;

        let artifact = self.reserve(extension);
        tokio::fs::write(artifact.path(), data).await.map_err(|e| {
            DubbingError::audio_processing(format!("Failed to save uploaded file: {}", e))
                .with_detail("error", e.to_string())
        })?;

        tracing::debug!(path = %artifact.path().display(), bytes = data.len(), "Saved temp artifact");
        Ok(artifact)
    }
}

/// Guard owning one temporary file.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    released: bool,
}

impl TempArtifact {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file.
    pub async fn read(&self) -> DubbingResult<Bytes> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|e| {
                DubbingError::audio_processing(format!("Failed to read converted audio: {}", e))
                    .with_detail("error", e.to_string())
            })
    }

    /// Deletes the file now. Missing files are fine; other failures are
    /// logged and swallowed.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp artifact"),
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temp artifact"
            ),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp artifact on drop"),
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temp artifact"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempArtifactStore::new(dir.path().join("scratch"));

        let artifact = store.persist(b"RIFF", "wav").await.unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.read().await.unwrap(), Bytes::from_static(b"RIFF"));

        artifact.release().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempArtifactStore::new(dir.path());

        let path = {
            let artifact = store.persist(b"ID3", "mp3").await.unwrap();
            artifact.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_of_missing_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempArtifactStore::new(dir.path());

        let artifact = store.reserve("mp3");
        assert!(!artifact.path().exists());
        artifact.release().await;
    }

    #[test]
    fn test_reserved_names_are_unique() {
        let store = TempArtifactStore::new("/tmp/unused");
        let a = store.reserve("mp3");
        let b = store.reserve("mp3");
        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().extension().and_then(|e| e.to_str()), Some("mp3"));
    }
}
