//! Read, compute, conditional write
//!
//! Every create or update of a record goes through this module. A record is
//! loaded together with its [`Revision`], the caller computes the new value
//! locally, and the write only commits if the record is still at that
//! revision (or, for creates, still absent). A failed precondition is
//! reported and never retried here.

use crate::{
    Result,
    backend::{Backend, Precondition, Revision},
    model::Listed,
    registry::errors::RegistryError,
};

/// A decoded record and the revision it was read at.
#[derive(Debug, Clone)]
pub(crate) struct Versioned<T> {
    pub value: T,
    pub revision: Revision,
}

/// Load and strictly decode the record at `key`.
///
/// A record that does not decode is an error here: it must never be
/// overwritten by an update computed from a guess.
pub(crate) async fn load<T>(
    backend: &Backend,
    key: &str,
    decode: impl FnOnce(&[u8]) -> Listed<T>,
) -> Result<Option<Versioned<T>>> {
    let Some(stored) = backend.get(key).await? else {
        tracing::debug!(key, "record not present");
        return Ok(None);
    };

    match decode(&stored.value) {
        Listed::Record(value) => Ok(Some(Versioned {
            value,
            revision: stored.revision,
        })),
        Listed::Corrupt { .. } => {
            tracing::warn!(key, revision = %stored.revision, "corrupt record");
            Err(RegistryError::CorruptRecord {
                key: key.to_string(),
            }
            .into())
        }
    }
}

/// Write a new record, failing with `collision` if anything is stored at `key`.
pub(crate) async fn commit_create(
    backend: &Backend,
    key: &str,
    value: Vec<u8>,
    collision: impl FnOnce() -> RegistryError,
) -> Result<()> {
    if backend.put(key, value, Precondition::Absent).await? {
        tracing::info!(key, "record created");
        Ok(())
    } else {
        tracing::debug!(key, "create collided with an existing record");
        Err(collision().into())
    }
}

/// Replace a record, failing with `Conflict` if it changed since `revision`.
pub(crate) async fn commit_update(
    backend: &Backend,
    key: &str,
    value: Vec<u8>,
    revision: Revision,
) -> Result<()> {
    if backend
        .put(key, value, Precondition::Revision(revision))
        .await?
    {
        tracing::info!(key, %revision, "record updated");
        Ok(())
    } else {
        tracing::warn!(key, %revision, "lost update race");
        Err(RegistryError::Conflict {
            key: key.to_string(),
        }
        .into())
    }
}
