//! JSON snapshot file backing a [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! The whole table is rewritten after every committed change. Writes go to a
//! sibling `.tmp` file first and are renamed into place, so a crash never
//! leaves a half-written document behind.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::actor_framework::Entity;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout: the id high-water mark plus every row.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SnapshotDocument<T: Entity> {
    #[serde(default)]
    pub last_id: Option<T::Id>,
    pub items: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when the file does not exist yet.
    pub async fn load<T: Entity>(&self) -> Result<Option<SnapshotDocument<T>>, PersistenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document = serde_json::from_slice(&bytes)?;
        Ok(Some(document))
    }

    pub async fn save<T: Entity>(&self, document: &SnapshotDocument<T>) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), rows = document.items.len(), "Snapshot written");
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
