//!
//! Plotacl: access-control administration for a multi-tenant stream-plotting service.
//! This library manages who may see which streams, stored in a shared key-value configuration store.
//!
//! ## Core Concepts
//!
//! * **Accounts (`model::Account`)**: A username, a stored credential and a set of granted tags. Every account carries the `public` tag.
//! * **Tag definitions (`model::TagDefinition`)**: A named, non-empty set of collection-path prefixes. The reserved `all` tag is virtual and grants every stream.
//! * **Permissions (`model::Permissions`)**: What an account may see, either every stream or the union of its tags' prefixes.
//! * **Backends (`backend::Backend`)**: The store contract, with optimistic-concurrency conditional writes and prefix scans.
//! * **Registry (`registry::Registry`)**: Account and tag-definition mutations built on read, compute, conditional write. A lost race is reported as a conflict, never retried.
//! * **Commands (`commands`)**: The administrative command table (`adduser`, `grant`, `ls`, ...) used by the REPL front end.

pub mod backend;
pub mod commands;
pub mod constants;
pub mod model;
pub mod permissions;
pub mod registry;
pub mod sets;

pub use backend::{Backend, BackendError};
pub use model::{Account, Listed, ModelError, Permissions, TagDefinition, TagGrant};
pub use permissions::{TagCache, resolve_permissions};
pub use registry::{Registry, RegistryError};

/// Result type used throughout the plotacl library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the plotacl library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured store errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured record errors from the model module
    #[error(transparent)]
    Model(model::ModelError),

    /// Structured registry errors from the registry module
    #[error(transparent)]
    Registry(registry::RegistryError),
}

/// Coarse classification of an [`Error`], as seen by callers deciding what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The named record does not exist
    NotFound,
    /// A create collided with an existing record
    AlreadyExists,
    /// A conditional write lost a race; retry with a fresh read
    Conflict,
    /// The request was rejected without writing anything
    InvalidOperation,
    /// The store could not be reached or did not answer in time
    StoreUnavailable,
    /// A stored record or file could not be decoded
    Corrupt,
    /// Credential derivation or verification failed
    Credential,
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Model(_) => "model",
            Error::Registry(_) => "registry",
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Backend(
                BackendError::DeserializationFailed { .. } | BackendError::UnsupportedVersion { .. },
            ) => ErrorKind::Corrupt,
            Error::Backend(_) => ErrorKind::StoreUnavailable,
            Error::Model(err) if err.is_credential_error() => ErrorKind::Credential,
            Error::Model(err) if err.is_invalid_operation() => ErrorKind::InvalidOperation,
            Error::Model(_) => ErrorKind::Corrupt,
            Error::Registry(RegistryError::TagResolution { source, .. }) => source.kind(),
            Error::Registry(err) if err.is_not_found() => ErrorKind::NotFound,
            Error::Registry(err) if err.is_already_exists() => ErrorKind::AlreadyExists,
            Error::Registry(err) if err.is_conflict() => ErrorKind::Conflict,
            Error::Registry(err) if err.is_invalid_operation() => ErrorKind::InvalidOperation,
            Error::Registry(_) => ErrorKind::Corrupt,
        }
    }

    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this error indicates a create collision.
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    /// Check if this error indicates a lost optimistic-concurrency race.
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Check if this error is a semantic rejection of the request.
    pub fn is_invalid_operation(&self) -> bool {
        self.kind() == ErrorKind::InvalidOperation
    }

    /// Check if this error comes from an unreachable or slow store.
    pub fn is_store_unavailable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }

    /// Check if this error indicates corrupt stored data.
    pub fn is_corrupt(&self) -> bool {
        self.kind() == ErrorKind::Corrupt
    }

    /// Check if this error is a failed tag lookup during permission resolution.
    pub fn is_tag_resolution_error(&self) -> bool {
        matches!(self, Error::Registry(RegistryError::TagResolution { .. }))
    }
}
