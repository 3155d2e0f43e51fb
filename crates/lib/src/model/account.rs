//! User accounts

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Credential, Listed, errors::ModelError};
use crate::{Result, constants::PUBLIC_TAG};

/// A user account as stored in the configuration store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique username (primary key)
    pub username: String,

    /// Stored credential (Argon2id PHC string)
    pub credential: Credential,

    /// Names of the tags granted to this account
    pub tags: HashSet<String>,
}

/// Result of a revoke that was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RevokeOutcome {
    /// `public` was named in the request and kept.
    pub public_retained: bool,
}

impl Account {
    /// Build a new account. The `public` tag is always added.
    pub fn new(username: impl Into<String>, credential: Credential, tags: HashSet<String>) -> Self {
        let mut tags = tags;
        tags.insert(PUBLIC_TAG.to_string());
        Self {
            username: username.into(),
            credential,
            tags,
        }
    }

    /// Add tags. Tags already present are left alone.
    pub fn grant(&mut self, tags: &HashSet<String>) {
        self.tags.extend(tags.iter().cloned());
    }

    /// Remove tags, keeping `public`.
    ///
    /// A request naming nothing but `public` is rejected, since it could only
    /// ever be a no-op.
    pub fn revoke(&mut self, tags: &HashSet<String>) -> Result<RevokeOutcome> {
        let public_requested = tags.contains(PUBLIC_TAG);
        if public_requested && tags.len() == 1 {
            return Err(ModelError::PublicTagRequired { tag: PUBLIC_TAG }.into());
        }

        self.tags
            .retain(|tag| tag == PUBLIC_TAG || !tags.contains(tag));
        Ok(RevokeOutcome {
            public_retained: public_requested,
        })
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| ModelError::Encoding { source }.into())
    }
}

/// Lenient shape used to tell corrupt records apart from valid ones.
#[derive(Deserialize)]
struct AccountRecord {
    username: Option<String>,
    credential: Option<Credential>,
    tags: Option<HashSet<String>>,
}

/// Decode a stored account, reporting records that do not have the expected
/// shape as corrupt rather than failing.
pub(crate) fn decode_account(username: &str, raw: &[u8]) -> Listed<Account> {
    match serde_json::from_slice::<AccountRecord>(raw) {
        Ok(AccountRecord {
            username: stored,
            credential: Some(credential),
            tags: Some(tags),
        }) if stored.as_deref().is_none_or(|stored| stored == username) => {
            Listed::Record(Account {
                username: username.to_string(),
                credential,
                tags,
            })
        }
        _ => Listed::Corrupt {
            name: username.to_string(),
        },
    }
}
