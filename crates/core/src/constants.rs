//! Constants used throughout the filestore core crate.
//!
//! Default locations and the environment variable names the binaries resolve at startup.

/// Default directory for blob storage when no explicit directory is configured.
pub const DEFAULT_STORAGE_DIR: &str = "storage";

/// Default location of the JSON metadata file.
pub const DEFAULT_METADATA_PATH: &str = "metadata/files.json";

/// Default ceiling for a single upload (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Environment variable overriding the blob storage directory.
pub const STORAGE_DIR_ENV: &str = "FILESTORE_STORAGE_DIR";

/// Environment variable overriding the metadata file location.
pub const METADATA_PATH_ENV: &str = "FILESTORE_METADATA_PATH";

/// Environment variable overriding the upload ceiling, in bytes.
pub const MAX_UPLOAD_BYTES_ENV: &str = "FILESTORE_MAX_UPLOAD_BYTES";
