//! Permission resolution
//!
//! An account's effective permissions are the union of the prefix sets of
//! its tags, unless it holds the `all` tag, in which case it sees every
//! stream and no tag is looked up at all.

mod cache;

pub use cache::TagCache;

use std::collections::HashSet;

use crate::{
    Result,
    constants::ALL_TAG,
    model::{Account, Listed, Permissions},
    registry::{Registry, RegistryError},
    sets,
};

/// One account's effective permissions, as shown by a bulk listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountPermissions {
    pub username: String,
    pub permissions: Permissions,
}

/// Resolve the streams an account may see.
///
/// Tags are looked up through `cache`, so a caller resolving many accounts
/// reads each distinct tag once. Tags are visited in name order.
///
/// # Errors
/// The first tag that cannot be looked up, including one that is not
/// defined, aborts resolution with [`RegistryError::TagResolution`].
pub async fn resolve_permissions(
    registry: &Registry,
    account: &Account,
    cache: &mut TagCache,
) -> Result<Permissions> {
    if account.tags.contains(ALL_TAG) {
        return Ok(Permissions::AllStreams);
    }

    let mut prefixes = HashSet::new();
    for tag in sets::to_sequence(&account.tags) {
        let granted = match cache.prefixes(registry, &tag).await {
            Ok(granted) => granted,
            Err(source) => {
                tracing::warn!(username = %account.username, tag = %tag, "could not resolve tag");
                return Err(RegistryError::TagResolution {
                    tag,
                    source: Box::new(source),
                }
                .into());
            }
        };
        prefixes.extend(granted.iter().cloned());
    }
    Ok(Permissions::Prefixes(prefixes))
}

impl Registry {
    /// Resolve the permissions of every account whose username starts with
    /// `prefix`, ordered by username.
    ///
    /// Corrupt account records are listed as corrupt. Any tag that fails to
    /// resolve aborts the whole listing.
    pub async fn list_permissions(&self, prefix: &str) -> Result<Vec<Listed<AccountPermissions>>> {
        let accounts = self.list_accounts(prefix).await?;
        let mut cache = TagCache::new();
        let mut listed = Vec::with_capacity(accounts.len());

        for account in accounts {
            let entry = match account {
                Listed::Record(account) => {
                    let permissions = resolve_permissions(self, &account, &mut cache).await?;
                    Listed::Record(AccountPermissions {
                        username: account.username,
                        permissions,
                    })
                }
                Listed::Corrupt { name } => Listed::Corrupt { name },
            };
            listed.push(entry);
        }

        tracing::debug!(
            prefix,
            accounts = listed.len(),
            lookups = cache.lookups(),
            "resolved permissions"
        );
        Ok(listed)
    }
}
