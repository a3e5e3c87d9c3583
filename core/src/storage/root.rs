use crate::prelude::{CacheError, CacheResult};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Base directory that holds the collection files.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Creates the directory (recursively) if it is missing.
    pub async fn ensure_root(&self) -> CacheResult<()> {
        fs::create_dir_all(&self.path)
            .await
            .map_err(|err| CacheError::unavailable(&self.path, err))
    }

    /// Seeds `file_name` with `document` unless the file already exists.
    ///
    /// Returns whether the file was created.
    pub async fn ensure_default<D: Serialize>(
        &self,
        file_name: &str,
        document: &D,
    ) -> CacheResult<bool> {
        self.ensure_root().await?;
        let path = self.file(file_name);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|err| CacheError::unavailable(&path, err))?;
        if exists {
            return Ok(false);
        }

        self.persist(file_name, document).await?;
        info!("seeded {} with default content", path.display());
        Ok(true)
    }

    /// Serializes the whole document and swaps it into place.
    ///
    /// The bytes land in a sibling temp file first so a concurrent reader sees
    /// either the old or the new document, never a prefix.
    pub async fn persist<D: Serialize>(&self, file_name: &str, document: &D) -> CacheResult<()> {
        let path = self.file(file_name);
        let bytes = serde_json::to_vec_pretty(document).map_err(|source| {
            CacheError::CorruptCollection {
                path: path.clone(),
                source,
            }
        })?;

        let staging = self
            .path
            .join(format!(".{}.{}.tmp", file_name, std::process::id()));
        let swapped = match fs::write(&staging, &bytes).await {
            Ok(()) => fs::rename(&staging, &path)
                .await
                .map_err(|err| CacheError::unavailable(&path, err)),
            Err(err) => Err(CacheError::unavailable(&staging, err)),
        };
        if let Err(err) = swapped {
            discard_staging(&staging).await;
            return Err(err);
        }

        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

async fn discard_staging(staging: &Path) {
    match fs::remove_file(staging).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("could not remove {}: {}", staging.display(), err),
    }
}
