use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{FileRepository, RepositoryError};
use crate::record::{FileNameUpdate, FileRecord, ListQuery, NewFileRecord};

/// In-memory metadata repository. Suitable for development and testing.
///
/// Records are kept in creation order behind a single lock, which makes every call atomic.
/// Not persistent: data is lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryFileRepository {
    records: RwLock<Vec<FileRecord>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, data: NewFileRecord) -> Result<FileRecord, RepositoryError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == data.storage_key) {
            return Err(RepositoryError::Conflict(data.storage_key));
        }

        let record = data.into_record(Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<Option<FileRecord>, RepositoryError> {
        let mut records = self.records.write().await;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|index| records.remove(index)))
    }

    async fn update(&self, update: FileNameUpdate) -> Result<FileRecord, RepositoryError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == update.id)
            .ok_or_else(|| RepositoryError::Missing(update.id.clone()))?;

        record.file_name = update.name;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<FileRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records[query.window(records.len())].to_vec())
    }
}
