use crate::config::ConfigError;
use crate::history::error::HistoryCacheError;
use crate::station::error::StationError;
use crate::store::error::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDeckError {
    #[error(transparent)]
    Station(#[from] StationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    HistoryCache(#[from] HistoryCacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
