use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryCacheError {
    #[error("Failed to read history cache '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse history cache '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to serialize history list")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write history cache '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to persist history cache '{0}'")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
