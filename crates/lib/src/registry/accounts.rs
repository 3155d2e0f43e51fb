//! Account operations

use std::collections::HashSet;

use super::{
    Registry, account_key,
    atomic::{self, Versioned},
    errors::RegistryError,
    record_name,
};
use crate::{
    Result,
    backend::Revision,
    constants::ACCOUNTS_NAMESPACE,
    model::{Account, Credential, Listed, RevokeOutcome, account::decode_account},
};

impl Registry {
    async fn load_account(&self, username: &str) -> Result<Versioned<Account>> {
        atomic::load(&self.backend, &account_key(username), |raw| {
            decode_account(username, raw)
        })
        .await?
        .ok_or_else(|| {
            RegistryError::AccountNotFound {
                username: username.to_string(),
            }
            .into()
        })
    }

    async fn store_account(&self, account: &Account, revision: Revision) -> Result<()> {
        atomic::commit_update(
            &self.backend,
            &account_key(&account.username),
            account.encode()?,
            revision,
        )
        .await
    }

    /// Create an account. The `public` tag is always granted.
    ///
    /// # Errors
    /// `AccountAlreadyExists` if the username is taken, including when another
    /// session creates it first.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        tags: HashSet<String>,
    ) -> Result<()> {
        let credential = Credential::from_password(password)?;
        let account = Account::new(username, credential, tags);
        atomic::commit_create(
            &self.backend,
            &account_key(username),
            account.encode()?,
            || RegistryError::AccountAlreadyExists {
                username: username.to_string(),
            },
        )
        .await
    }

    /// Replace an account's credential.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<()> {
        let Versioned {
            value: mut account,
            revision,
        } = self.load_account(username).await?;
        account.credential = Credential::from_password(password)?;
        self.store_account(&account, revision).await
    }

    /// Add tags to an account. Tags need not be defined yet.
    pub async fn grant_tags(&self, username: &str, tags: &HashSet<String>) -> Result<()> {
        let Versioned {
            value: mut account,
            revision,
        } = self.load_account(username).await?;
        account.grant(tags);
        self.store_account(&account, revision).await
    }

    /// Remove tags from an account. `public` is never removed.
    ///
    /// A request naming only `public` is rejected without writing.
    pub async fn revoke_tags(
        &self,
        username: &str,
        tags: &HashSet<String>,
    ) -> Result<RevokeOutcome> {
        let Versioned {
            value: mut account,
            revision,
        } = self.load_account(username).await?;
        let outcome = account.revoke(tags)?;
        self.store_account(&account, revision).await?;
        Ok(outcome)
    }

    /// Delete an account. Returns how many accounts were removed (0 or 1).
    pub async fn delete_account(&self, username: &str) -> Result<u64> {
        let deleted = self.backend.delete(&account_key(username)).await?;
        tracing::info!(username, deleted, "deleted account");
        Ok(deleted)
    }

    /// Delete every account whose username starts with `prefix`.
    pub async fn delete_accounts_with_prefix(&self, prefix: &str) -> Result<u64> {
        let count = self.backend.delete_prefix(&account_key(prefix)).await?;
        tracing::info!(prefix, count, "deleted accounts by prefix");
        Ok(count)
    }

    /// Look up one account.
    pub async fn account(&self, username: &str) -> Result<Account> {
        Ok(self.load_account(username).await?.value)
    }

    /// Verify a password against the stored credential.
    ///
    /// # Errors
    /// `AccountNotFound` for an unknown user, `InvalidPassword` on mismatch.
    pub async fn check_password(&self, username: &str, password: &str) -> Result<()> {
        self.account(username).await?.credential.verify(password)
    }

    /// List every account whose username starts with `prefix`, ordered by username.
    ///
    /// Records that do not decode are listed as [`Listed::Corrupt`].
    pub async fn list_accounts(&self, prefix: &str) -> Result<Vec<Listed<Account>>> {
        let records = self.backend.scan_prefix(&account_key(prefix)).await?;
        Ok(records
            .iter()
            .map(|(key, raw)| {
                let listed = decode_account(record_name(ACCOUNTS_NAMESPACE, key), raw);
                if listed.is_corrupt() {
                    tracing::warn!(key = %key, "corrupt account record");
                }
                listed
            })
            .collect())
    }
}
