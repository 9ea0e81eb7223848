//! Filesystem-backed photo storage.
//!
//! Photos are uploaded elsewhere; a record only keeps `{url, storageId}`.
//! Here `storageId` is a path relative to the uploads directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::backend::storage::traits::PhotoStorage;

#[derive(Debug, Clone)]
pub struct FsPhotoStorage {
    root: PathBuf,
}

impl FsPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a storage id under the root, refusing anything that could escape it
    fn resolve(&self, storage_id: &str) -> Result<PathBuf> {
        let relative = Path::new(storage_id);
        if storage_id.is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
        {
            bail!("Invalid photo storage id: {:?}", storage_id);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl PhotoStorage for FsPhotoStorage {
    async fn release(&self, storage_id: &str) -> Result<()> {
        let path = self.resolve(storage_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Released photo {}", storage_id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Photo {} was already gone", storage_id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
