//! Error types for the record model
use thiserror::Error;

/// Errors raised while building, changing or encoding records.
///
/// These are rejected locally, before anything is written to the store.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Each tag must be assigned at least one prefix (use undeftag or undeftags to fully remove a tag)")]
    EmptyPrefixSet { tag: String },

    #[error("All user accounts must be assigned the \"{tag}\" tag")]
    PublicTagRequired { tag: &'static str },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Stored credential is malformed")]
    MalformedCredential,

    #[error("Credential derivation failed: {reason}")]
    CredentialDerivation { reason: String },

    #[error("Record encoding failed")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Check if this error is a semantic rejection of the requested change.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            ModelError::EmptyPrefixSet { .. } | ModelError::PublicTagRequired { .. }
        )
    }

    /// Check if this error concerns credentials.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidPassword
                | ModelError::MalformedCredential
                | ModelError::CredentialDerivation { .. }
        )
    }
}

impl From<ModelError> for crate::Error {
    fn from(err: ModelError) -> Self {
        crate::Error::Model(err)
    }
}
