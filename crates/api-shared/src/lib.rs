//! # API Shared
//!
//! Shared definitions for the filestore transports.
//!
//! Contains:
//! - Request and response bodies with OpenAPI schemas
//! - Shared services like `HealthService`
//! - API key validation
//!
//! Used by `api-rest`; the bodies mirror the sanitized records returned by the storage
//! coordinator.

use filestore_files::FileView;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub mod auth;
pub mod health;

pub use auth::{validate_api_key, AuthError, API_KEY_HEADER};
pub use health::HealthService;

/// Default page number when a list request omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when a list request omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Public view of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataRes {
    pub id: String,
    pub storage_key: String,
    pub file_name: String,
    pub mimetype: String,
    /// Leading dot included, empty when the upload had none
    pub file_extension: String,
    pub size: u64,
    /// RFC 3339 timestamp of the upload
    pub upload_date: String,
}

impl From<FileView> for FileMetadataRes {
    fn from(view: FileView) -> Self {
        Self {
            id: view.id,
            storage_key: view.storage_key,
            file_name: view.file_name,
            mimetype: view.mimetype,
            file_extension: view.file_extension,
            size: view.size,
            upload_date: view.upload_date.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesRes {
    pub files: Vec<FileMetadataRes>,
    pub page: i64,
    pub page_size: i64,
}

/// Query string of `GET /files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    /// 1-based page number
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListFilesQuery {
    /// `(page, page_size)` with the defaults filled in.
    pub fn resolve(self) -> (i64, i64) {
        (
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Body of `PATCH /files/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateFileReq {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
