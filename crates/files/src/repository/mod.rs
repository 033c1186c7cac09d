//! Metadata repository abstraction.

mod memory;

pub use memory::InMemoryFileRepository;

use crate::record::{FileNameUpdate, FileRecord, ListQuery, NewFileRecord};
use async_trait::async_trait;

/// Errors from metadata repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The record targeted by an update does not exist
    #[error("record not found: {0}")]
    Missing(String),

    /// A record with this identifier already exists
    #[error("record already exists: {0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure, or a broken repository contract
    #[error("backend error: {0}")]
    Backend(String),
}

/// Persistence for file metadata records.
///
/// Each call must be atomic with respect to a single identifier: of two concurrent `delete`s for
/// the same id, exactly one returns the record.
///
/// The identifier of a created record must equal the storage key it was created with; the
/// coordinator rebuilds blob paths from it.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Stores a new record and returns it with identifier and timestamps filled in.
    async fn create(&self, data: NewFileRecord) -> Result<FileRecord, RepositoryError>;

    /// Looks up a record by identifier.
    async fn get(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError>;

    /// Removes a record, returning its data, or `None` when nothing matched.
    async fn delete(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError>;

    /// Changes a record's `file_name` and refreshes `updated_at`. Nothing else is touched.
    async fn update(&self, update: FileNameUpdate) -> Result<FileRecord, RepositoryError>;

    /// Returns a window of records in creation order.
    async fn list(&self, query: ListQuery) -> Result<Vec<FileRecord>, RepositoryError>;
}
