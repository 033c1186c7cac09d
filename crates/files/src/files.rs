//! Storage coordinator implementation
//!
//! [`FilesService`] sequences every operation across the blob store and the metadata
//! repository.
//!
//! # Ordering
//!
//! Metadata is always mutated last:
//!
//! | operation         | steps                                                         |
//! |-------------------|---------------------------------------------------------------|
//! | `upload`          | ensure dir → write blob → create record                       |
//! | `delete`          | get record → remove blob → delete record                      |
//! | `update_metadata` | get record → update record (blob untouched)                   |
//!
//! A failure leaves at worst an unreferenced blob (upload) or a record whose blob is gone
//! (delete). Neither is repaired automatically.
//!
//! # Implementation Notes
//!
//! - The service holds no mutable state; it can be shared behind an `Arc`
//! - Steps inside an operation run strictly in sequence
//! - The repository is the serialization point for racing calls on one identifier

use crate::blob::{blob_path, with_path_context, BlobStore, LocalBlobStore};
use crate::record::{
    DownloadedFile, FileNameUpdate, FileRecord, FileView, ListRequest, NewFileRecord,
    UploadedFile,
};
use crate::repository::{FileRepository, RepositoryError};
use crate::{naming, FilesError};
use filestore_uuid::{KeyGenerator, RandomKeyGenerator, StorageKey};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage coordinator keeping blobs and metadata records consistent.
///
/// # Design
///
/// - Blobs live flat under `storage_dir` as `<id><extension>`
/// - Identifiers are freshly generated storage keys; record id == storage key
/// - Every record leaves the service sanitized as a [`FileView`]
pub struct FilesService {
    /// Directory holding every blob
    storage_dir: PathBuf,

    repository: Arc<dyn FileRepository>,

    blobs: Arc<dyn BlobStore>,

    keys: Arc<dyn KeyGenerator>,
}

impl fmt::Debug for FilesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesService")
            .field("storage_dir", &self.storage_dir)
            .finish_non_exhaustive()
    }
}

impl FilesService {
    /// Creates a service storing blobs on the local filesystem under `storage_dir`.
    ///
    /// No I/O happens here; the directory is created on the first upload.
    pub fn new(storage_dir: impl Into<PathBuf>, repository: Arc<dyn FileRepository>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            repository,
            blobs: Arc::new(LocalBlobStore::new()),
            keys: Arc::new(RandomKeyGenerator),
        }
    }

    /// Replaces the blob store.
    #[must_use]
    pub fn with_blob_store(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = blobs;
        self
    }

    /// Replaces the storage key generator.
    #[must_use]
    pub fn with_key_generator(mut self, keys: Arc<dyn KeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// Directory holding the blobs.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Path of the blob for record `id` with extension `extension`.
    pub fn blob_path(&self, id: &str, extension: &str) -> PathBuf {
        blob_path(&self.storage_dir, id, extension)
    }

    /// Stores an uploaded file and records its metadata.
    ///
    /// The blob is fully written before the metadata record is created, so a failed write never
    /// leaves a record behind.
    ///
    /// # Errors
    ///
    /// - [`FilesError::Io`] if the storage directory cannot be created or the blob cannot be
    ///   written (no record is created)
    /// - [`FilesError::Repository`] if the record cannot be created (the blob stays on disk)
    pub async fn upload(&self, file: UploadedFile) -> Result<FileView, FilesError> {
        let UploadedFile {
            original_name,
            content,
            mime_type,
            size,
        } = file;

        let (file_name, file_extension) = naming::split_original_name(&original_name);
        let storage_key = self.keys.generate().to_string();

        self.prepare_storage_dir().await?;

        let path = self.blob_path(&storage_key, &file_extension);
        self.blobs
            .write(&path, &content)
            .await
            .map_err(|e| with_path_context(e, "Failed to write blob to", &path))?;
        tracing::debug!("wrote {} bytes to {}", content.len(), path.display());

        let created = self
            .repository
            .create(NewFileRecord {
                storage_key: storage_key.clone(),
                file_name,
                mimetype: mime_type,
                file_extension,
                size,
            })
            .await;

        let record = match created {
            Ok(record) if record.id == storage_key => record,
            Ok(record) => {
                tracing::warn!(
                    "repository returned id {} for storage key {}; blob {} is unreferenced",
                    record.id,
                    storage_key,
                    path.display()
                );
                return Err(RepositoryError::Backend(format!(
                    "record id {} does not match storage key {}",
                    record.id, storage_key
                ))
                .into());
            }
            Err(e) => {
                tracing::warn!(
                    "metadata create failed, blob {} is unreferenced: {}",
                    path.display(),
                    e
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            id = %record.id,
            size = record.size,
            mimetype = %record.mimetype,
            "stored file {}{}",
            record.file_name,
            record.file_extension
        );
        Ok(FileView::sanitize(record))
    }

    /// Reads a stored file back.
    ///
    /// The blob path is rebuilt from `id` and the extension recorded in metadata.
    ///
    /// # Errors
    ///
    /// - [`FilesError::NotFound`] if no record matches `id`
    /// - [`FilesError::Io`] if the blob cannot be read, including when it is missing despite
    ///   the record
    pub async fn download(&self, id: &str) -> Result<DownloadedFile, FilesError> {
        let record = self.require(id).await?;
        let path = self.blob_path(id, &record.file_extension);

        let content = self
            .blobs
            .read(&path)
            .await
            .map_err(|e| with_path_context(e, "Failed to read blob from", &path))?;

        Ok(DownloadedFile {
            content,
            mimetype: record.mimetype,
            size: record.size,
        })
    }

    /// Removes a stored file and its record.
    ///
    /// The blob goes first; a blob that is already missing counts as removed. This and the
    /// directory probe in `upload` are the only I/O errors the service swallows. The record is
    /// deleted last, and the repository decides which of several racing deletes wins.
    ///
    /// # Errors
    ///
    /// - [`FilesError::NotFound`] if no record matches `id`, before or after blob removal
    /// - [`FilesError::Io`] if the blob exists but cannot be removed (the record is kept)
    /// - [`FilesError::Repository`] if the record cannot be deleted (the blob is already gone)
    pub async fn delete(&self, id: &str) -> Result<(), FilesError> {
        let record = self.require(id).await?;
        let path = self.blob_path(id, &record.file_extension);

        match self.blobs.remove(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("blob {} was already missing for record {}", path.display(), id);
            }
            Err(e) => return Err(with_path_context(e, "Failed to remove blob at", &path).into()),
        }

        match self.repository.delete(id).await? {
            Some(_) => {
                tracing::info!(id = %id, "deleted file");
                Ok(())
            }
            None => Err(FilesError::NotFound(id.to_owned())),
        }
    }

    /// Lists one page of sanitized records in repository order.
    ///
    /// No bounds validation: `page` values below 1 are passed through as non-positive offsets.
    pub async fn list(&self, request: ListRequest) -> Result<Vec<FileView>, FilesError> {
        let records = self.repository.list(request.to_query()).await?;
        Ok(records.into_iter().map(FileView::sanitize).collect())
    }

    /// Returns the sanitized record for `id`.
    ///
    /// # Errors
    ///
    /// [`FilesError::NotFound`] if no record matches.
    pub async fn get_metadata(&self, id: &str) -> Result<FileView, FilesError> {
        self.require(id).await.map(FileView::sanitize)
    }

    /// Renames a stored file. Only the name changes.
    ///
    /// # Errors
    ///
    /// [`FilesError::NotFound`] if no record matches `update.id`.
    pub async fn update_metadata(&self, update: FileNameUpdate) -> Result<FileView, FilesError> {
        self.require(&update.id).await?;

        let id = update.id.clone();
        let updated = match self.repository.update(update).await {
            Ok(record) => record,
            // Deleted between the lookup and the update.
            Err(RepositoryError::Missing(_)) => return Err(FilesError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(id = %id, "renamed file to {}", updated.file_name);
        Ok(FileView::sanitize(updated))
    }

    /// Looks up the record for `id`.
    ///
    /// Only canonical storage keys can name a record, so anything else (including path-like
    /// input that would escape `storage_dir`) is reported as not found without a lookup.
    async fn require(&self, id: &str) -> Result<FileRecord, FilesError> {
        if let Err(e) = StorageKey::parse(id) {
            tracing::debug!("rejecting identifier: {}", e);
            return Err(FilesError::NotFound(id.to_owned()));
        }

        self.repository
            .get(id)
            .await?
            .ok_or_else(|| FilesError::NotFound(id.to_owned()))
    }

    /// Idempotently creates the storage directory before a write.
    ///
    /// The existence probe only decides whether creation is logged; a failed probe counts as
    /// "absent".
    async fn prepare_storage_dir(&self) -> Result<(), FilesError> {
        let existed = match self.blobs.exists(&self.storage_dir).await {
            Ok(existed) => existed,
            Err(e) => {
                tracing::debug!(
                    "could not probe storage directory {}: {}",
                    self.storage_dir.display(),
                    e
                );
                false
            }
        };

        self.blobs
            .ensure_dir(&self.storage_dir)
            .await
            .map_err(|e| {
                with_path_context(e, "Failed to create storage directory", &self.storage_dir)
            })?;

        if !existed {
            tracing::info!("created storage directory {}", self.storage_dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ListQuery;
    use crate::repository::InMemoryFileRepository;
    use async_trait::async_trait;
    use filestore_uuid::SequentialKeyGenerator;
    use std::fs;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        storage_dir: PathBuf,
        repository: Arc<InMemoryFileRepository>,
        service: FilesService,
    }

    /// Service with deterministic keys writing into a not-yet-existing directory
    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let storage_dir = temp.path().join("storage").join("blobs");
        let repository = Arc::new(InMemoryFileRepository::new());
        let service = FilesService::new(&storage_dir, repository.clone())
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));
        Fixture {
            _temp: temp,
            storage_dir,
            repository,
            service,
        }
    }

    fn pdf_upload() -> UploadedFile {
        UploadedFile {
            original_name: "report.v2.pdf".into(),
            content: b"%PDF...".to_vec(),
            mime_type: "application/pdf".into(),
            size: 1024,
        }
    }

    /// Blob store whose writes always fail
    struct ReadOnlyBlobStore;

    #[async_trait]
    impl BlobStore for ReadOnlyBlobStore {
        async fn exists(&self, path: &Path) -> io::Result<bool> {
            LocalBlobStore.exists(path).await
        }
        async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
            LocalBlobStore.ensure_dir(path).await
        }
        async fn write(&self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"))
        }
        async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            LocalBlobStore.read(path).await
        }
        async fn remove(&self, path: &Path) -> io::Result<()> {
            LocalBlobStore.remove(path).await
        }
    }

    /// Blob store whose directory probe fails but which otherwise works
    struct BlindBlobStore {
        probed: AtomicBool,
    }

    #[async_trait]
    impl BlobStore for BlindBlobStore {
        async fn exists(&self, _path: &Path) -> io::Result<bool> {
            self.probed.store(true, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "no stat"))
        }
        async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
            LocalBlobStore.ensure_dir(path).await
        }
        async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            LocalBlobStore.write(path, bytes).await
        }
        async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            LocalBlobStore.read(path).await
        }
        async fn remove(&self, path: &Path) -> io::Result<()> {
            LocalBlobStore.remove(path).await
        }
    }

    /// Blob store that cannot remove anything
    struct PinnedBlobStore;

    #[async_trait]
    impl BlobStore for PinnedBlobStore {
        async fn exists(&self, path: &Path) -> io::Result<bool> {
            LocalBlobStore.exists(path).await
        }
        async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
            LocalBlobStore.ensure_dir(path).await
        }
        async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
            LocalBlobStore.write(path, bytes).await
        }
        async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            LocalBlobStore.read(path).await
        }
        async fn remove(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "immutable file"))
        }
    }

    /// In-memory repository whose first delete fails
    struct FlakyDeleteRepository {
        inner: InMemoryFileRepository,
        failed: AtomicBool,
    }

    #[async_trait]
    impl FileRepository for FlakyDeleteRepository {
        async fn create(&self, data: NewFileRecord) -> Result<FileRecord, RepositoryError> {
            self.inner.create(data).await
        }
        async fn get(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
            self.inner.get(id).await
        }
        async fn delete(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(RepositoryError::Backend("lost connection".into()));
            }
            self.inner.delete(id).await
        }
        async fn update(&self, update: FileNameUpdate) -> Result<FileRecord, RepositoryError> {
            self.inner.update(update).await
        }
        async fn list(&self, query: ListQuery) -> Result<Vec<FileRecord>, RepositoryError> {
            self.inner.list(query).await
        }
    }

    /// Repository that refuses to create records
    struct RejectingRepository;

    #[async_trait]
    impl FileRepository for RejectingRepository {
        async fn create(&self, _data: NewFileRecord) -> Result<FileRecord, RepositoryError> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn get(&self, _id: &str) -> Result<Option<FileRecord>, RepositoryError> {
            Ok(None)
        }
        async fn delete(&self, _id: &str) -> Result<Option<FileRecord>, RepositoryError> {
            Ok(None)
        }
        async fn update(&self, update: FileNameUpdate) -> Result<FileRecord, RepositoryError> {
            Err(RepositoryError::Missing(update.id))
        }
        async fn list(&self, _query: ListQuery) -> Result<Vec<FileRecord>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_upload_report_scenario() {
        let fx = fixture();

        let view = fx.service.upload(pdf_upload()).await.unwrap();

        assert_eq!(view.id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(view.storage_key, view.id);
        assert_eq!(view.file_name, "report");
        assert_eq!(view.file_extension, ".pdf");
        assert_eq!(view.mimetype, "application/pdf");
        assert_eq!(view.size, 1024);

        let stored = fx.storage_dir.join(format!("{}.pdf", view.id));
        assert_eq!(fs::read(&stored).unwrap(), b"%PDF...");

        let download = fx.service.download(&view.id).await.unwrap();
        assert_eq!(download.content, b"%PDF...");
        assert_eq!(download.mimetype, "application/pdf");
        assert_eq!(download.size, 1024);
    }

    #[tokio::test]
    async fn test_upload_creates_missing_storage_dir() {
        let fx = fixture();
        assert!(!fx.storage_dir.exists());

        fx.service.upload(pdf_upload()).await.unwrap();

        assert!(fx.storage_dir.is_dir());
    }

    #[tokio::test]
    async fn test_upload_without_extension() {
        let fx = fixture();

        let view = fx
            .service
            .upload(UploadedFile::new("README", b"read me".to_vec(), "text/plain"))
            .await
            .unwrap();

        assert_eq!(view.file_name, "README");
        assert_eq!(view.file_extension, "");

        let path = fx.service.blob_path(&view.id, &view.file_extension);
        assert!(!path.to_string_lossy().ends_with('.'));
        assert!(path.exists());

        let download = fx.service.download(&view.id).await.unwrap();
        assert_eq!(download.content, b"read me");
    }

    #[tokio::test]
    async fn test_upload_and_download_roundtrip() {
        let fx = fixture();

        let test_cases = vec![
            ("text.txt", b"Plain text content".to_vec(), "text/plain"),
            ("empty.dat", vec![], "application/octet-stream"),
            ("binary.bin", (0..=255).collect(), "application/octet-stream"),
        ];

        for (filename, content, mime) in test_cases {
            let view = fx
                .service
                .upload(UploadedFile::new(filename, content.clone(), mime))
                .await
                .unwrap();
            let download = fx.service.download(&view.id).await.unwrap();

            assert_eq!(download.content, content, "Round-trip failed for {}", filename);
            assert_eq!(download.mimetype, mime);
            assert_eq!(download.size, content.len() as u64);
        }
    }

    #[tokio::test]
    async fn test_upload_with_random_keys() {
        let temp = TempDir::new().unwrap();
        let service = FilesService::new(temp.path(), Arc::new(InMemoryFileRepository::new()));

        let a = service.upload(pdf_upload()).await.unwrap();
        let b = service.upload(pdf_upload()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(StorageKey::is_canonical(&a.id));
    }

    #[tokio::test]
    async fn test_write_failure_creates_no_record() {
        let fx = fixture();
        let service = FilesService::new(&fx.storage_dir, fx.repository.clone())
            .with_blob_store(Arc::new(ReadOnlyBlobStore));

        let result = service.upload(pdf_upload()).await;

        match result {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected I/O error, got {:?}", other),
        }
        assert!(fx.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_directory_creation_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        // A regular file where the storage directory's parent should be
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let repository = Arc::new(InMemoryFileRepository::new());
        let service = FilesService::new(blocker.join("storage"), repository.clone());

        let result = service.upload(pdf_upload()).await;

        assert!(matches!(result, Err(FilesError::Io(_))));
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_probe_still_creates_directory() {
        let fx = fixture();
        let blobs = Arc::new(BlindBlobStore {
            probed: AtomicBool::new(false),
        });
        let service =
            FilesService::new(&fx.storage_dir, fx.repository.clone()).with_blob_store(blobs.clone());

        let view = service.upload(pdf_upload()).await.unwrap();

        assert!(blobs.probed.load(Ordering::SeqCst));
        assert!(fx.storage_dir.is_dir());
        assert!(service.download(&view.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_repository_failure_leaves_orphan_blob() {
        let temp = TempDir::new().unwrap();
        let service = FilesService::new(temp.path(), Arc::new(RejectingRepository))
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));

        let result = service.upload(pdf_upload()).await;

        assert!(matches!(
            result,
            Err(FilesError::Repository(RepositoryError::Backend(_)))
        ));
        let orphan = temp
            .path()
            .join("00000000-0000-0000-0000-000000000001.pdf");
        assert!(orphan.exists());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let fx = fixture();
        let id = "6fa459ea-ee8a-3ca4-894e-db77e160355e";

        assert!(matches!(
            fx.service.get_metadata(id).await,
            Err(FilesError::NotFound(ref missing)) if missing == id
        ));
        assert!(matches!(
            fx.service.download(id).await,
            Err(FilesError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete(id).await,
            Err(FilesError::NotFound(_))
        ));
        assert!(matches!(
            fx.service
                .update_metadata(FileNameUpdate {
                    id: id.into(),
                    name: "x".into()
                })
                .await,
            Err(FilesError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_record() {
        let fx = fixture();
        let view = fx.service.upload(pdf_upload()).await.unwrap();
        let path = fx.service.blob_path(&view.id, &view.file_extension);
        assert!(path.exists());

        fx.service.delete(&view.id).await.unwrap();

        assert!(!path.exists());
        assert!(fx.service.get_metadata(&view.id).await.unwrap_err().is_not_found());
        assert!(fx.service.download(&view.id).await.unwrap_err().is_not_found());
        assert!(fx.service.delete(&view.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_with_missing_blob_still_removes_record() {
        let fx = fixture();
        let view = fx.service.upload(pdf_upload()).await.unwrap();
        fs::remove_file(fx.service.blob_path(&view.id, &view.file_extension)).unwrap();

        fx.service.delete(&view.id).await.unwrap();

        assert!(fx.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_download_missing_blob_is_io_error() {
        let fx = fixture();
        let view = fx.service.upload(pdf_upload()).await.unwrap();
        fs::remove_file(fx.service.blob_path(&view.id, &view.file_extension)).unwrap();

        match fx.service.download(&view.id).await {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_deletes_one_wins() {
        let fx = fixture();
        let view = fx.service.upload(pdf_upload()).await.unwrap();
        let service = Arc::new(fx.service);

        let first = {
            let service = service.clone();
            let id = view.id.clone();
            tokio::spawn(async move { service.delete(&id).await })
        };
        let second = {
            let service = service.clone();
            let id = view.id.clone();
            tokio::spawn(async move { service.delete(&id).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let not_found = results
            .iter()
            .filter(|r| matches!(r, Err(FilesError::NotFound(_))))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(not_found, 1);
    }

    #[tokio::test]
    async fn test_blob_remove_failure_keeps_record() {
        let fx = fixture();
        let service = FilesService::new(&fx.storage_dir, fx.repository.clone())
            .with_blob_store(Arc::new(PinnedBlobStore));
        let view = service.upload(pdf_upload()).await.unwrap();

        match service.delete(&view.id).await {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected I/O error, got {:?}", other),
        }

        assert!(service.get_metadata(&view.id).await.is_ok());
        assert_eq!(service.download(&view.id).await.unwrap().content, b"%PDF...");
    }

    #[tokio::test]
    async fn test_repository_delete_failure_is_retryable() {
        let temp = TempDir::new().unwrap();
        let repository = Arc::new(FlakyDeleteRepository {
            inner: InMemoryFileRepository::new(),
            failed: AtomicBool::new(false),
        });
        let service = FilesService::new(temp.path(), repository.clone())
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));
        let view = service.upload(pdf_upload()).await.unwrap();
        let path = service.blob_path(&view.id, &view.file_extension);

        let result = service.delete(&view.id).await;
        assert!(matches!(
            result,
            Err(FilesError::Repository(RepositoryError::Backend(_)))
        ));

        // Blob gone, record dangling
        assert!(!path.exists());
        assert!(service.get_metadata(&view.id).await.is_ok());
        match service.download(&view.id).await {
            Err(FilesError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected I/O error, got {:?}", other),
        }

        service.delete(&view.id).await.unwrap();
        assert!(repository.inner.is_empty().await);
        assert!(service.get_metadata(&view.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_non_canonical_ids_are_not_found() {
        let fx = fixture();
        let view = fx.service.upload(pdf_upload()).await.unwrap();
        let braced = format!("{{{}}}", view.id);

        for id in [
            "../outside",
            "00000000-0000-0000-0000-000000000001/../x",
            braced.as_str(),
            "",
        ] {
            assert!(fx.service.download(id).await.unwrap_err().is_not_found());
            assert!(fx.service.delete(id).await.unwrap_err().is_not_found());
        }

        assert!(fx.service.download(&view.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_changes_only_name() {
        let fx = fixture();
        let original = fx.service.upload(pdf_upload()).await.unwrap();

        let updated = fx
            .service
            .update_metadata(FileNameUpdate {
                id: original.id.clone(),
                name: "X".into(),
            })
            .await
            .unwrap();
        assert_eq!(updated.file_name, "X");

        let fetched = fx.service.get_metadata(&original.id).await.unwrap();
        assert_eq!(fetched.file_name, "X");
        assert_eq!(fetched.mimetype, original.mimetype);
        assert_eq!(fetched.size, original.size);
        assert_eq!(fetched.file_extension, original.file_extension);
        assert_eq!(fetched.storage_key, original.storage_key);
        assert_eq!(fetched.upload_date, original.upload_date);

        // The blob keeps its original name
        assert!(fx
            .service
            .blob_path(&original.id, ".pdf")
            .exists());
        assert!(fx.service.download(&original.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_pages() {
        let fx = fixture();
        let mut ids = Vec::new();
        for i in 0..5 {
            let view = fx
                .service
                .upload(UploadedFile::new(
                    format!("file{}.txt", i),
                    vec![i as u8],
                    "text/plain",
                ))
                .await
                .unwrap();
            ids.push(view.id);
        }

        let first = fx
            .service
            .list(ListRequest { page_size: 2, page: 1 })
            .await
            .unwrap();
        let first_ids: Vec<_> = first.iter().map(|v| v.id.clone()).collect();
        assert_eq!(first_ids, ids[0..2]);

        let last = fx
            .service
            .list(ListRequest { page_size: 2, page: 3 })
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].id, ids[4]);

        let beyond = fx
            .service
            .list(ListRequest { page_size: 2, page: 4 })
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_list_page_zero_is_passed_through() {
        let fx = fixture();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fx.service
                .upload(UploadedFile::new(name, b"x".to_vec(), "text/plain"))
                .await
                .unwrap();
        }

        // offset -2 is clamped by the repository, not the coordinator
        let page = fx
            .service
            .list(ListRequest { page_size: 2, page: 0 })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].file_name, "a");
    }

    #[tokio::test]
    async fn test_returned_records_are_sanitized() {
        let fx = fixture();
        let uploaded = fx.service.upload(pdf_upload()).await.unwrap();
        let listed = fx
            .service
            .list(ListRequest { page_size: 10, page: 1 })
            .await
            .unwrap();
        let fetched = fx.service.get_metadata(&uploaded.id).await.unwrap();
        let renamed = fx
            .service
            .update_metadata(FileNameUpdate {
                id: uploaded.id.clone(),
                name: "renamed".into(),
            })
            .await
            .unwrap();

        let mut views = vec![uploaded, fetched, renamed];
        views.extend(listed);
        for view in views {
            let json = serde_json::to_value(&view).unwrap();
            assert!(json.get("createdAt").is_none());
            assert!(json.get("updatedAt").is_none());
            assert!(json.get("uploadDate").is_some());
        }
    }

    #[test]
    fn test_blob_path_is_flat() {
        let service = FilesService::new("/srv/blobs", Arc::new(InMemoryFileRepository::new()));
        let path = service.blob_path("abc", ".txt");
        assert_eq!(path, PathBuf::from("/srv/blobs/abc.txt"));
        assert_eq!(path.parent(), Some(service.storage_dir()));
    }

    #[test]
    fn test_debug_shows_storage_dir() {
        let service = FilesService::new("/srv/blobs", Arc::new(InMemoryFileRepository::new()));
        assert!(format!("{:?}", service).contains("/srv/blobs"));
    }
}
