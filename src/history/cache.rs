//! Local cache of the last-seen history list.
//!
//! The dashboard keeps one small artifact on disk: the most recent readings it
//! has observed, newest first, capped at a configured count. It exists so a
//! freshly opened view has something to show before the first fetch lands; it
//! is an opportunistic convenience, not a store of record.

use crate::history::error::HistoryCacheError;
use crate::types::reading::Reading;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

const CACHE_FILE_NAME: &str = "recent_history.json";

/// Capped, newest-first JSON cache of recently observed readings.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    path: PathBuf,
    cap: usize,
}

impl HistoryCache {
    /// Creates a cache stored as `recent_history.json` under `cache_dir`,
    /// keeping at most `cap` readings.
    pub fn new(cache_dir: &Path, cap: usize) -> Self {
        Self {
            path: cache_dir.join(CACHE_FILE_NAME),
            cap,
        }
    }

    /// Loads the cached list. A missing file is an empty list, not an error.
    pub async fn load(&self) -> Result<Vec<Reading>, HistoryCacheError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryCacheError::Read(self.path.clone(), e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| HistoryCacheError::Parse(self.path.clone(), e))
    }

    /// Replaces the cached list with `readings`, sorted newest first and
    /// truncated to the cap. The file is written atomically so a crash never
    /// leaves a half-written list behind.
    pub async fn store(&self, readings: &[Reading]) -> Result<(), HistoryCacheError> {
        let mut list = readings.to_vec();
        list.sort_by(|a, b| b.time.cmp(&a.time));
        list.truncate(self.cap);

        let json = serde_json::to_vec_pretty(&list).map_err(HistoryCacheError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HistoryCacheError::Write(self.path.clone(), e))?;
        }

        let path = self.path.clone();
        task::spawn_blocking(move || {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file =
                NamedTempFile::new_in(dir).map_err(|e| HistoryCacheError::Write(path.clone(), e))?;
            temp_file
                .write_all(&json)
                .map_err(|e| HistoryCacheError::Write(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| HistoryCacheError::Persist(path.clone(), e))?;
            Ok::<(), HistoryCacheError>(())
        })
        .await??;

        debug!("Cached {} readings to {}", list.len(), self.path.display());
        Ok(())
    }
}
