//! Blob store abstraction and the local filesystem backend.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-like byte storage addressed by path.
///
/// Paths are built by the coordinator; implementations store and return bytes verbatim and
/// report failures as plain [`io::Error`]s so that callers can inspect the kind.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether something exists at `path`.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Creates `path` and any missing parents. Succeeds if it already exists.
    async fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Writes `bytes` to `path`, replacing any previous content.
    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Reads the whole blob at `path`.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Removes the blob at `path`. A missing blob yields [`io::ErrorKind::NotFound`].
    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`BlobStore`] backed by the local filesystem through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBlobStore;

impl LocalBlobStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        fs::try_exists(path).await
    }

    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes).await
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}

/// Adds `action` and `path` to an I/O error message while keeping its kind.
pub(crate) fn with_path_context(error: io::Error, action: &str, path: &Path) -> io::Error {
    io::Error::new(
        error.kind(),
        format!("{} {}: {}", action, path.display(), error),
    )
}

/// `<dir>/<stem><extension>`
pub(crate) fn blob_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}{}", stem, extension))
}
