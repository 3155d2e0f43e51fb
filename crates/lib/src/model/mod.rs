//! Record model for accounts and tag definitions
//!
//! Records are plain serde types stored as JSON documents. Changes are
//! computed locally on an owned copy and only reach the store through the
//! registry's conditional writes.

pub mod account;
pub mod crypto;
pub mod errors;
pub mod tag;

pub use account::{Account, RevokeOutcome};
pub use crypto::Credential;
pub use errors::ModelError;
pub use tag::{Permissions, TagDefinition, TagGrant, TagRef};

/// One row of a bulk listing.
///
/// Records whose payload does not decode into the expected shape are still
/// listed, by name, so that an operator can find and remove them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listed<T> {
    /// A well-formed record
    Record(T),
    /// A record stored under `name` that could not be decoded
    Corrupt { name: String },
}

impl<T> Listed<T> {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Listed::Corrupt { .. })
    }

    /// The decoded record, if any.
    pub fn record(&self) -> Option<&T> {
        match self {
            Listed::Record(record) => Some(record),
            Listed::Corrupt { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Listed<U> {
        match self {
            Listed::Record(record) => Listed::Record(f(record)),
            Listed::Corrupt { name } => Listed::Corrupt { name },
        }
    }
}
