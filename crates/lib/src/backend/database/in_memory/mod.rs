//! In-memory database backend implementation
//!
//! This module provides an in-memory implementation of the [`KvBackend`]
//! trait, suitable for testing, development, and single-host deployments
//! where the configuration is persisted to a JSON file between runs.

mod persistence;
mod storage;

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;
use crate::backend::{KvBackend, Precondition, Revision, VersionedValue};

/// Records and the revision counter, guarded together so that a conditional
/// write observes and bumps the counter atomically.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) records: BTreeMap<String, VersionedValue>,
    /// Revision assigned to the most recent successful write.
    pub(crate) revision: Revision,
}

/// A simple in-memory store keyed by string with etcd-style revisions.
///
/// Every successful write bumps a store-wide revision counter and stamps the
/// written record with it. Conditional writes compare against the stamp, so a
/// writer that read a record before another writer replaced it can never
/// commit on top of the newer value.
///
/// It provides basic persistence via [`InMemory::save_to_file`] and
/// [`InMemory::load_from_file`], serializing the records to JSON.
#[derive(Debug, Default)]
pub struct InMemory {
    pub(crate) state: RwLock<State>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the keys of all records currently stored.
    pub async fn all_keys(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.records.keys().cloned().collect()
    }

    /// Returns the revision of the most recent successful write.
    pub async fn current_revision(&self) -> Revision {
        self.state.read().await.revision
    }

    /// Stores `value` at `key` unconditionally.
    ///
    /// Intended for seeding fixtures and for importing records that bypass the
    /// registry (for example to reproduce corrupt entries).
    pub async fn put_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Revision {
        storage::put_unconditional(self, key.into(), value.into()).await
    }

    /// Saves all records to a specified file as JSON.
    ///
    /// # Arguments
    /// * `path` - The path to the file where the state should be saved.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the store from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` store is returned.
    ///
    /// # Arguments
    /// * `path` - The path to the file from which to load the state.
    ///
    /// # Returns
    /// A `Result` containing the loaded store or an I/O or deserialization error.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

#[async_trait]
impl KvBackend for InMemory {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        Ok(storage::get(self, key).await)
    }

    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        Ok(storage::put_conditional(self, key, value, precondition).await)
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        Ok(storage::delete(self, key).await)
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        Ok(storage::delete_prefix(self, prefix).await)
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(storage::scan_prefix(self, prefix).await)
    }
}
