use super::root::StorageRoot;
use crate::prelude::{CacheError, CacheResult, Collection};
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

/// Owner of one collection file.
///
/// All access goes through `lock`, held for the whole of each operation and
/// released on every exit path when the guard drops.
pub struct CollectionStore<C: Collection> {
    root: StorageRoot,
    lock: Mutex<()>,
    _collection: PhantomData<C>,
}

impl<C: Collection> CollectionStore<C> {
    pub fn new(root: StorageRoot) -> Self {
        Self {
            root,
            lock: Mutex::new(()),
            _collection: PhantomData,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.file(C::FILE_NAME)
    }

    /// Loads the document, materializing the default on first access.
    pub async fn read(&self) -> CacheResult<C::Document> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Overwrites the whole document.
    pub async fn write(&self, document: &C::Document) -> CacheResult<()> {
        let _guard = self.lock.lock().await;
        self.root.ensure_root().await?;
        self.root.persist(C::FILE_NAME, document).await
    }

    /// Restores the seed document.
    pub async fn reset(&self) -> CacheResult<()> {
        self.write(&C::default_document()).await
    }

    /// Read-modify-write under the lock.
    ///
    /// When `mutate` fails nothing is written back.
    pub async fn update<F, R>(&self, mutate: F) -> CacheResult<R>
    where
        F: FnOnce(&mut C::Document) -> CacheResult<R>,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let outcome = mutate(&mut document)?;
        self.root.persist(C::FILE_NAME, &document).await?;
        Ok(outcome)
    }

    async fn load(&self) -> CacheResult<C::Document> {
        self.root
            .ensure_default(C::FILE_NAME, &C::default_document())
            .await?;
        let path = self.path();
        let bytes = fs::read(&path)
            .await
            .map_err(|err| CacheError::unavailable(&path, err))?;
        serde_json::from_slice(&bytes).map_err(|source| CacheError::CorruptCollection { path, source })
    }
}
