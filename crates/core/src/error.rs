use filestore_files::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to open metadata repository: {0}")]
    MetadataOpen(#[source] RepositoryError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
