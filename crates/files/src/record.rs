//! Metadata records and the values that cross the coordinator boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored file, as kept by a [`crate::FileRepository`].
///
/// Timestamps are managed by the repository and never leave the coordinator; callers receive a
/// [`FileView`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Record identifier; equal to `storage_key`
    pub id: String,

    /// Stem of the blob filename
    pub storage_key: String,

    /// Base name supplied at upload, extension stripped
    pub file_name: String,

    /// Extension including its leading dot, or empty
    pub file_extension: String,

    /// MIME type recorded at upload
    pub mimetype: String,

    /// Byte length recorded at upload
    pub size: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields handed to the repository when a record is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    pub storage_key: String,
    pub file_name: String,
    pub mimetype: String,
    pub file_extension: String,
    pub size: u64,
}

impl NewFileRecord {
    /// Materialises the record with both timestamps set to `now`.
    ///
    /// The identifier is the storage key, which is what the coordinator relies on to rebuild
    /// blob paths.
    pub fn into_record(self, now: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: self.storage_key.clone(),
            storage_key: self.storage_key,
            file_name: self.file_name,
            file_extension: self.file_extension,
            mimetype: self.mimetype,
            size: self.size,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Rename request: the only mutation a record accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNameUpdate {
    pub id: String,
    pub name: String,
}

/// Repository-level page window.
///
/// Values are passed through from the coordinator unchecked; see [`ListQuery::window`] for how
/// the supplied repositories interpret out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    /// Index range selected by this query over `len` records.
    ///
    /// A negative offset is clamped to zero; a non-positive limit selects nothing.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset.max(0))
            .unwrap_or(usize::MAX)
            .min(len);
        if self.limit <= 0 {
            return start..start;
        }
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        start..start.saturating_add(take).min(len)
    }
}

/// Caller-facing page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub page_size: i64,
    pub page: i64,
}

impl ListRequest {
    /// Translates the page request into a repository window.
    ///
    /// `offset = (page - 1) * page_size`, saturating rather than overflowing. No bounds are
    /// enforced here: `page <= 0` produces a zero or negative offset.
    pub fn to_query(self) -> ListQuery {
        ListQuery {
            limit: self.page_size,
            offset: self.page.saturating_sub(1).saturating_mul(self.page_size),
        }
    }
}

/// Sanitized record: what every coordinator operation returns.
///
/// The repository's `created_at`/`updated_at` are replaced by a single `upload_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub id: String,
    pub storage_key: String,
    pub file_name: String,
    pub mimetype: String,
    pub file_extension: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
}

impl FileView {
    /// Drops the internal timestamps and exposes `created_at` as `upload_date`.
    pub fn sanitize(record: FileRecord) -> Self {
        let FileRecord {
            id,
            storage_key,
            file_name,
            file_extension,
            mimetype,
            size,
            created_at,
            updated_at: _,
        } = record;

        Self {
            id,
            storage_key,
            file_name,
            mimetype,
            file_extension,
            size,
            upload_date: created_at,
        }
    }
}

impl From<FileRecord> for FileView {
    fn from(record: FileRecord) -> Self {
        Self::sanitize(record)
    }
}

/// An incoming upload held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side filename, e.g. `report.v2.pdf`
    pub original_name: String,
    pub content: Vec<u8>,
    pub mime_type: String,
    /// Byte count reported alongside the upload
    pub size: u64,
}

impl UploadedFile {
    /// Builds an upload whose reported size is the content length.
    pub fn new(
        original_name: impl Into<String>,
        content: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        let size = content.len() as u64;
        Self {
            original_name: original_name.into(),
            content,
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Blob content plus the metadata needed to serve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub content: Vec<u8>,
    pub mimetype: String,
    pub size: u64,
}
