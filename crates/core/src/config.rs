//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the core services.
//! Request handling never reads process-wide environment variables, which would behave
//! inconsistently in multi-threaded runtimes and test harnesses.

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_METADATA_PATH, DEFAULT_STORAGE_DIR};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    storage_dir: PathBuf,
    metadata_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The metadata file must not sit directly inside the blob directory: that directory holds
    /// nothing but `<id><extension>` blobs.
    pub fn new(storage_dir: PathBuf, metadata_path: PathBuf) -> CoreResult<Self> {
        if storage_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "storage directory cannot be empty".into(),
            ));
        }
        if metadata_path.as_os_str().is_empty() || metadata_path.file_name().is_none() {
            return Err(CoreError::InvalidInput(
                "metadata path must name a file".into(),
            ));
        }
        if metadata_path.parent() == Some(storage_dir.as_path()) {
            return Err(CoreError::InvalidInput(format!(
                "metadata file {} must live outside the blob directory",
                metadata_path.display()
            )));
        }

        Ok(Self {
            storage_dir,
            metadata_path,
        })
    }

    /// Build from optional raw values (typically environment variables or CLI flags).
    ///
    /// Missing or blank values fall back to [`DEFAULT_STORAGE_DIR`] and
    /// [`DEFAULT_METADATA_PATH`].
    pub fn from_values(
        storage_dir: Option<String>,
        metadata_path: Option<String>,
    ) -> CoreResult<Self> {
        let storage_dir = non_blank(storage_dir).unwrap_or_else(|| DEFAULT_STORAGE_DIR.into());
        let metadata_path =
            non_blank(metadata_path).unwrap_or_else(|| DEFAULT_METADATA_PATH.into());

        Self::new(PathBuf::from(storage_dir), PathBuf::from(metadata_path))
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }
}

/// Parse the upload ceiling from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_UPLOAD_BYTES`].
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> CoreResult<usize> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    match value.parse::<usize>() {
        Ok(0) => Err(CoreError::InvalidInput(
            "max upload size must be greater than zero".into(),
        )),
        Ok(bytes) => Ok(bytes),
        Err(e) => Err(CoreError::InvalidInput(format!(
            "max upload size '{}' is not a byte count: {}",
            value, e
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
