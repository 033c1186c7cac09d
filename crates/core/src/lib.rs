//! # Filestore Core
//!
//! Runtime wiring for the filestore service.
//!
//! This crate binds the storage coordinator in `filestore_files` to the concrete collaborators
//! used in production:
//! - Startup configuration resolved from environment values or CLI flags
//! - A JSON-file metadata repository kept outside the blob directory
//! - Media type resolution for uploads that arrive without a trustworthy type
//! - A single constructor that opens the repository and builds the coordinator
//!
//! **No API concerns**: HTTP servers, authentication and request parsing belong in `api-rest`
//! and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod media;
pub mod metadata;

pub use config::{max_upload_bytes_from_env_value, CoreConfig};
pub use error::{CoreError, CoreResult};
pub use media::resolve_media_type;
pub use metadata::JsonFileRepository;

pub use filestore_files::{
    DownloadedFile, FileNameUpdate, FileView, FilesError, FilesService, ListRequest,
    UploadedFile,
};

pub use filestore_types::{MediaType, NonEmptyText, TextError};

use std::sync::Arc;

/// Opens the metadata repository described by `cfg` and builds a [`FilesService`] over it.
///
/// The blob directory is not touched here; it is created lazily on the first upload.
///
/// # Errors
///
/// Returns [`CoreError::MetadataOpen`] if the metadata file exists but cannot be read or
/// parsed.
pub async fn open_files_service(cfg: &CoreConfig) -> CoreResult<FilesService> {
    let repository = JsonFileRepository::open(cfg.metadata_path())
        .await
        .map_err(CoreError::MetadataOpen)?;

    tracing::info!(
        "files service ready: blobs in {}, metadata in {}",
        cfg.storage_dir().display(),
        cfg.metadata_path().display()
    );

    Ok(FilesService::new(cfg.storage_dir(), Arc::new(repository)))
}
