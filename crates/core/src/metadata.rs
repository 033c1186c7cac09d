//! JSON-file metadata repository.
//!
//! The production binding of [`FileRepository`] for single-node deployments. All records are
//! held in memory and mirrored to one pretty-printed JSON array:
//!
//! ```text
//! metadata/
//! └── files.json     # [{"id": "...", "storageKey": "...", "fileName": "...", ...}, ...]
//! ```
//!
//! Every mutation rewrites the whole file through a temporary sibling and a rename, under a
//! single async mutex. The in-memory copy only changes once the file write succeeded, so a
//! failed write leaves both views at the previous state.

use async_trait::async_trait;
use chrono::Utc;
use filestore_files::{
    FileNameUpdate, FileRecord, FileRepository, ListQuery, NewFileRecord, RepositoryError,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Metadata repository persisted as a JSON file.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    records: Mutex<Vec<FileRecord>>,
}

impl JsonFileRepository {
    /// Loads the repository from `path`.
    ///
    /// A missing or blank file is an empty repository; the file (and its parent directories)
    /// are created on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the file exists but cannot be read and
    /// [`RepositoryError::Serialization`] if it is not a valid record array.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();

        let records = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "loaded {} metadata records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[FileRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FileRepository for JsonFileRepository {
    async fn create(&self, data: NewFileRecord) -> Result<FileRecord, RepositoryError> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == data.storage_key) {
            return Err(RepositoryError::Conflict(data.storage_key));
        }

        let record = data.into_record(Utc::now());
        let mut next = records.clone();
        next.push(record.clone());
        self.persist(&next).await?;
        *records = next;
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
        let mut records = self.records.lock().await;
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let mut next = records.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;
        *records = next;
        Ok(Some(removed))
    }

    async fn update(&self, update: FileNameUpdate) -> Result<FileRecord, RepositoryError> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| r.id == update.id)
            .ok_or_else(|| RepositoryError::Missing(update.id.clone()))?;

        let mut next = records.clone();
        let record = &mut next[index];
        record.file_name = update.name;
        record.updated_at = Utc::now();
        let updated = record.clone();

        self.persist(&next).await?;
        *records = next;
        Ok(updated)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<FileRecord>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records[query.window(records.len())].to_vec())
    }
}
