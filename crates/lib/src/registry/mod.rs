//! Account and tag-definition registry
//!
//! [`Registry`] is the entry point for every administrative operation. It
//! keeps no state of its own beyond a [`Backend`] handle: each operation
//! reads what it needs, computes the change locally and commits it with a
//! conditional write (see the `atomic` module). Racing sessions therefore
//! never clobber one another; the loser gets [`RegistryError::Conflict`].
//!
//! Accounts are stored under `accounts/<username>` and tag definitions under
//! `tagdefs/<tag>`, below the backend's deployment namespace.

mod accounts;
mod atomic;
pub mod errors;
mod tags;

pub use errors::RegistryError;

use crate::{
    backend::Backend,
    constants::{ACCOUNTS_NAMESPACE, TAGDEFS_NAMESPACE},
};

/// Administrative view over the shared configuration store.
#[derive(Clone, Debug)]
pub struct Registry {
    backend: Backend,
}

impl Registry {
    /// Create a registry over `backend`.
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

fn account_key(username: &str) -> String {
    format!("{ACCOUNTS_NAMESPACE}{username}")
}

fn tag_key(tag: &str) -> String {
    format!("{TAGDEFS_NAMESPACE}{tag}")
}

/// Strip a kind namespace from a scanned key.
fn record_name<'a>(namespace: &str, key: &'a str) -> &'a str {
    key.strip_prefix(namespace).unwrap_or(key)
}
