//! Backend implementations for plotacl storage
//!
//! This module provides the [`KvBackend`] trait, the contract the registry
//! requires from the shared configuration store, together with the
//! [`Backend`] wrapper that applies the deployment key namespace, the
//! development [`database::InMemory`] store and the [`database::FileStore`]
//! used by the command-line tool.
//!
//! The store is expected to be shared by several administrative sessions at
//! once, so every write that replaces a record is conditional on the record's
//! [`Revision`] (optimistic concurrency). Replication, consensus and the wire
//! protocol of a production store are the concern of its binding, not of this
//! crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub mod database;
pub mod errors;
mod namespace;

pub use errors::BackendError;
pub use namespace::Backend;

/// Version token of a stored record.
///
/// Revisions are assigned by the store on every successful write and never
/// reused for the same key, so an unchanged revision means an unchanged record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Condition that must hold for a conditional write to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No record may exist at the key (create).
    Absent,
    /// The record must still be at this revision (update).
    Revision(Revision),
}

/// A stored value together with the revision it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    /// Raw record payload
    pub value: Vec<u8>,
    /// Revision of the write that produced `value`
    pub revision: Revision,
}

/// Key-value store contract required by the registry.
///
/// All implementations must be `Send` and `Sync` so that one store handle can
/// be shared by every operation of a process. Implementations must make
/// [`KvBackend::put`] atomic with respect to its [`Precondition`]: of two
/// writers presenting the same stale revision, exactly one commits.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Reads the value and revision stored at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>>;

    /// Stores `value` at `key` if `precondition` holds.
    ///
    /// # Returns
    /// `Ok(true)` if the write committed, `Ok(false)` if the precondition
    /// failed. Transport failures are reported as errors.
    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool>;

    /// Removes the record at `key`. Returns how many records were removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64>;

    /// Removes every record whose key starts with `prefix`. Returns how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64>;

    /// Returns every `(key, value)` whose key starts with `prefix`, ordered by key.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;
}
