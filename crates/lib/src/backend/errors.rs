//! Store error types for the plotacl backend.
//!
//! Every failure reported here is a transport or availability problem of the
//! configuration store. The registry never interprets these errors; it
//! surfaces them to the caller unchanged.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the configuration store.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store could not be reached or refused the request.
    #[error("Store unavailable: {reason}")]
    Unavailable {
        /// Description of the failure reported by the store binding
        reason: String,
    },

    /// A store call did not finish within the configured time.
    #[error("Store call timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed
        after: Duration,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// Persistence file has a format version this build cannot read.
    #[error("Unsupported persistence version {found}; only version {supported} is supported")]
    UnsupportedVersion {
        /// Version found in the file
        found: u8,
        /// Version this build writes
        supported: u8,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Check if this error is a transient availability problem.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable { .. } | BackendError::Timeout { .. }
        )
    }

    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }

    /// Check if this error is related to I/O or encoding of persisted state.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
                | BackendError::UnsupportedVersion { .. }
        )
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
