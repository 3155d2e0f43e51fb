//! Error types for registry operations.
//!
//! This module defines the structured errors reported by account and tag
//! definition operations: missing records, create collisions, lost
//! optimistic-concurrency races and protected reserved tags.

use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No account is stored under the username.
    #[error("User not found: {username}")]
    AccountNotFound {
        /// The username that was looked up
        username: String,
    },

    /// No definition is stored for the tag.
    #[error("Tag not found: {tag}")]
    TagNotFound {
        /// The tag that was looked up
        tag: String,
    },

    /// An account with the username already exists.
    #[error("Already exists")]
    AccountAlreadyExists {
        /// The username that collided
        username: String,
    },

    /// A tag with the name already exists (always the case for `all`).
    #[error("Already exists")]
    TagAlreadyExists {
        /// The tag that collided
        tag: String,
    },

    /// Another writer changed the record between our read and our write.
    ///
    /// Never retried internally; the caller should retry with a fresh read.
    #[error("Transaction for atomic update failed; try again")]
    Conflict {
        /// Logical key of the contended record
        key: String,
    },

    /// The reserved `all` tag cannot be defined, modified or deleted.
    #[error("Cannot {operation} \"{tag}\" tag")]
    ReservedTag {
        /// The reserved tag name
        tag: String,
        /// The refused operation, e.g. "modify definition of"
        operation: &'static str,
    },

    /// A record needed for a mutation could not be decoded.
    #[error("Corrupt entry at {key}")]
    CorruptRecord {
        /// Logical key of the corrupt record
        key: String,
    },

    /// A tag referenced by an account could not be resolved.
    #[error("Could not retrieve tag information for '{tag}': {source}")]
    TagResolution {
        /// The tag that failed to resolve
        tag: String,
        /// Why the lookup failed
        #[source]
        source: Box<crate::Error>,
    },
}

impl RegistryError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::AccountNotFound { .. } | RegistryError::TagNotFound { .. }
        )
    }

    /// Check if this error indicates a create collision.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            RegistryError::AccountAlreadyExists { .. } | RegistryError::TagAlreadyExists { .. }
        )
    }

    /// Check if this error indicates a lost optimistic-concurrency race.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RegistryError::Conflict { .. })
    }

    /// Check if this error is a semantic rejection.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, RegistryError::ReservedTag { .. })
    }

    /// Check if this error is about a corrupt stored record.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, RegistryError::CorruptRecord { .. })
    }
}

// Conversion from RegistryError to the main Error type
impl From<RegistryError> for crate::Error {
    fn from(err: RegistryError) -> Self {
        crate::Error::Registry(err)
    }
}
