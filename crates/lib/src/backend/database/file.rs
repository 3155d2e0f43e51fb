//! File-backed store shared between processes
//!
//! Several `plotacl` sessions may point at the same data file. Each store
//! call takes an exclusive OS-level lock on a `.lock` file next to the data
//! file, reloads the data file, applies the call to the loaded state and
//! writes the file back if anything changed. A conditional write presenting
//! a revision that another process has since replaced therefore fails its
//! precondition instead of overwriting the newer record.

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fs2::FileExt;

use super::InMemory;
use crate::{
    Error, Result,
    backend::{BackendError, KvBackend, Precondition, VersionedValue},
};

/// A JSON data file used as the configuration store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open the store kept in `path`.
    ///
    /// A missing file is an empty store and is created by the first write. An
    /// existing file that cannot be read is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut lock_path = path.as_os_str().to_os_string();
        lock_path.push(".lock");
        let store = Self {
            path,
            lock_path: lock_path.into(),
        };
        store.snapshot().await?;
        Ok(store)
    }

    /// The data file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current contents of the data file, read under the lock.
    pub async fn snapshot(&self) -> Result<InMemory> {
        let _lock = FileLock::acquire(&self.lock_path).await?;
        InMemory::load_from_file(&self.path).await
    }

    /// Run `op` against freshly loaded state while holding the lock.
    ///
    /// `op` reports whether it changed the state; only then is the file
    /// rewritten. The work runs on its own task so that a caller giving up
    /// (for example on a timeout) cannot leave the lock released mid-save.
    async fn locked<T, F, Fut>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<InMemory>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(T, bool)>> + Send + 'static,
    {
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        tokio::spawn(async move {
            let _lock = FileLock::acquire(&lock_path).await?;
            let state = Arc::new(InMemory::load_from_file(&path).await?);
            let (output, changed) = op(state.clone()).await?;
            if changed {
                state.save_to_file(&path).await?;
                tracing::debug!(path = %path.display(), "saved configuration store");
            }
            Ok::<T, Error>(output)
        })
        .await
        .map_err(|e| -> Error {
            BackendError::Unavailable {
                reason: format!("store task failed: {e}"),
            }
            .into()
        })?
    }
}

#[async_trait]
impl KvBackend for FileStore {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        let key = key.to_string();
        self.locked(move |state| async move {
            Ok::<_, Error>((state.get(&key).await?, false))
        })
        .await
    }

    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        let key = key.to_string();
        self.locked(move |state| async move {
            let committed = state.put(&key, value, precondition).await?;
            Ok::<_, Error>((committed, committed))
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let key = key.to_string();
        self.locked(move |state| async move {
            let removed = state.delete(&key).await?;
            Ok::<_, Error>((removed, removed > 0))
        })
        .await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        let prefix = prefix.to_string();
        self.locked(move |state| async move {
            let removed = state.delete_prefix(&prefix).await?;
            Ok::<_, Error>((removed, removed > 0))
        })
        .await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let prefix = prefix.to_string();
        self.locked(move |state| async move {
            Ok::<_, Error>((state.scan_prefix(&prefix).await?, false))
        })
        .await
    }
}

/// Exclusive lock on the store's lock file, released on drop.
struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    async fn acquire(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        let locked = tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            file.lock_exclusive()?;
            Ok::<_, std::io::Error>(Self { file, path })
        })
        .await
        .map_err(|e| -> Error {
            BackendError::Unavailable {
                reason: format!("lock task failed: {e}"),
            }
            .into()
        })?;
        locked.map_err(|source| BackendError::FileIo { source }.into())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}
