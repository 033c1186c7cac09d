//! Filestore file storage
//!
//! This crate keeps uploaded binary content and its metadata consistent across two independent
//! stores.
//!
//! ## Design Principles
//!
//! - Bytes live in a flat blob directory; descriptive metadata lives in a separate repository
//! - Blob names are random storage keys, never content hashes
//! - The storage key doubles as the metadata record's identifier
//! - The repository is the sole source of truth for which blobs exist
//! - Metadata is always mutated last: the blob store is touched first and the repository write
//!   commits the operation
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_dir>/
//! ├── 550e8400-e29b-41d4-a716-446655440000.pdf
//! ├── 6fa459ea-ee8a-3ca4-894e-db77e160355e      # uploaded without an extension
//! └── …
//! ```
//!
//! ## Failure Windows
//!
//! There is no transaction spanning both stores. Two windows are accepted and logged:
//!
//! - `upload` writes the blob, then creates the record. If the create fails the blob stays on
//!   disk unreferenced.
//! - `delete` removes the blob, then the record. If the record removal fails the record points
//!   at a missing blob; `download` reports an I/O error and repeating `delete` finishes the job.
//!
//! ## Example Usage
//!
//! ```no_run
//! use filestore_files::{FilesService, InMemoryFileRepository, UploadedFile};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), filestore_files::FilesError> {
//! let service = FilesService::new("storage", Arc::new(InMemoryFileRepository::new()));
//!
//! let view = service
//!     .upload(UploadedFile::new("notes.txt", b"hello".to_vec(), "text/plain"))
//!     .await?;
//! let download = service.download(&view.id).await?;
//! assert_eq!(download.content, b"hello");
//! # Ok(())
//! # }
//! ```

mod blob;
mod files;
mod media;
mod naming;
mod record;
mod repository;

pub use blob::{BlobStore, LocalBlobStore};
pub use files::FilesService;
pub use filestore_uuid::{KeyGenerator, RandomKeyGenerator, SequentialKeyGenerator, StorageKey};
pub use media::sniff_media_type;
pub use naming::{file_extension, file_name, split_original_name};
pub use record::{
    DownloadedFile, FileNameUpdate, FileRecord, FileView, ListQuery, ListRequest, NewFileRecord,
    UploadedFile,
};
pub use repository::{FileRepository, InMemoryFileRepository, RepositoryError};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// No metadata record matches the identifier
    #[error("File not found: {0}")]
    NotFound(String),

    /// Blob store failure (directory creation, write, read or remove)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata repository failure
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl FilesError {
    /// True for the caller-visible "missing resource" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FilesError::NotFound(_))
    }
}
