//! Account commands.
//!
//! Argument slices exclude the command name and have already passed the
//! command's arity check.

use std::io::Write;

use zeroize::Zeroizing;

use super::{
    CommandError,
    output::{print_deleted, print_entry, print_listed, print_set},
    prefix_arg,
};
use crate::{constants::PUBLIC_TAG, registry::Registry, sets::to_set};

/// `adduser username password [tag...]`
pub(super) async fn add_user(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    let password = Zeroizing::new(args[1].to_string());
    registry
        .create_account(args[0], &password, to_set(args[2..].iter().copied()))
        .await?;
    Ok(())
}

/// `setpassword username password`
pub(super) async fn set_password(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    let password = Zeroizing::new(args[1].to_string());
    registry.set_password(args[0], &password).await?;
    Ok(())
}

/// `rmuser username...`, stopping at the first failure
pub(super) async fn remove_users(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    for username in args {
        registry.delete_account(username).await?;
    }
    Ok(())
}

/// `rmusers usernameprefix`
pub(super) async fn remove_users_with_prefix(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let count = registry.delete_accounts_with_prefix(args[0]).await?;
    print_deleted(out, count, "account", "accounts")?;
    Ok(())
}

/// `grant username tag...`
pub(super) async fn grant(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    registry
        .grant_tags(args[0], &to_set(args[1..].iter().copied()))
        .await?;
    Ok(())
}

/// `revoke username tag...`
pub(super) async fn revoke(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let outcome = registry
        .revoke_tags(args[0], &to_set(args[1..].iter().copied()))
        .await?;
    if outcome.public_retained {
        writeln!(
            out,
            "All user accounts must be assigned the \"{PUBLIC_TAG}\" tag"
        )?;
    }
    Ok(())
}

/// `showuser username...`, stopping at the first failure
pub(super) async fn show_users(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for username in args {
        let account = registry.account(username).await?;
        print_set(out, &account.username, &account.tags)?;
    }
    Ok(())
}

/// `lsusers [prefix]`
pub(super) async fn list_users(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for listed in registry.list_accounts(prefix_arg(args)).await? {
        print_listed(out, &listed, |out, account| {
            print_set(out, &account.username, &account.tags)
        })?;
    }
    Ok(())
}

/// `ls [prefix]`
///
/// Nothing is printed if any account's permissions fail to resolve.
pub(super) async fn list_permissions(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for listed in registry.list_permissions(prefix_arg(args)).await? {
        print_listed(out, &listed, |out, entry| {
            print_entry(out, &entry.username, &entry.permissions)
        })?;
    }
    Ok(())
}
