//! REST server settings resolved once at startup.

use filestore_core::constants::{MAX_UPLOAD_BYTES_ENV, METADATA_PATH_ENV, STORAGE_DIR_ENV};
use filestore_core::{max_upload_bytes_from_env_value, CoreConfig, CoreResult};

/// Environment variable overriding the listen address.
pub const REST_ADDR_ENV: &str = "FILESTORE_REST_ADDR";

/// Environment variable holding the API key; unset disables the check.
pub const API_KEY_ENV: &str = "FILESTORE_API_KEY";

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub core: CoreConfig,
    pub addr: String,
    pub api_key: Option<String>,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Reads every `FILESTORE_*` variable once.
    pub fn from_env() -> CoreResult<Self> {
        let var = |name: &str| std::env::var(name).ok();

        Self::from_values(
            var(STORAGE_DIR_ENV),
            var(METADATA_PATH_ENV),
            var(REST_ADDR_ENV),
            var(API_KEY_ENV),
            var(MAX_UPLOAD_BYTES_ENV),
        )
    }

    pub fn from_values(
        storage_dir: Option<String>,
        metadata_path: Option<String>,
        addr: Option<String>,
        api_key: Option<String>,
        max_upload_bytes: Option<String>,
    ) -> CoreResult<Self> {
        Ok(Self {
            core: CoreConfig::from_values(storage_dir, metadata_path)?,
            addr: addr
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_REST_ADDR.into()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            max_upload_bytes: max_upload_bytes_from_env_value(max_upload_bytes)?,
        })
    }
}
