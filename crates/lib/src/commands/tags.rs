//! Tag definition commands.

use std::io::Write;

use super::{
    CommandError,
    output::{print_deleted, print_entry, print_listed},
    prefix_arg,
};
use crate::{constants::ALL_TAG, model::TagRef, registry::Registry, sets::to_set};

/// `deftag tag prefix...`
pub(super) async fn define(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    registry
        .define_tag(args[0], to_set(args[1..].iter().copied()))
        .await?;
    Ok(())
}

/// `undeftag tag...`
///
/// `all` is skipped with a message; any other failure stops the command.
pub(super) async fn undefine(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for tag in args {
        if let TagRef::All = TagRef::parse(tag) {
            writeln!(out, "Tag \"{ALL_TAG}\" cannot be deleted")?;
            continue;
        }
        registry.delete_tag(tag).await?;
    }
    Ok(())
}

/// `undeftags prefix`
pub(super) async fn undefine_with_prefix(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let count = registry.delete_tags_with_prefix(args[0]).await?;
    print_deleted(out, count, "tag definition", "tag definitions")?;
    Ok(())
}

/// `addprefix tag prefix...`
pub(super) async fn add_prefixes(registry: &Registry, args: &[&str]) -> Result<(), CommandError> {
    registry
        .add_prefixes(args[0], &to_set(args[1..].iter().copied()))
        .await?;
    Ok(())
}

/// `rmprefix tag prefix...`
pub(super) async fn remove_prefixes(
    registry: &Registry,
    args: &[&str],
) -> Result<(), CommandError> {
    registry
        .remove_prefixes(args[0], &to_set(args[1..].iter().copied()))
        .await?;
    Ok(())
}

/// `showtagdef tag...`, stopping at the first failure
pub(super) async fn show(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for tag in args {
        let grant = registry.tag_grant(tag).await?;
        print_entry(out, &grant.tag, &grant.permissions)?;
    }
    Ok(())
}

/// `lstagdefs [prefix]`
pub(super) async fn list(
    registry: &Registry,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    for listed in registry.list_tag_definitions(prefix_arg(args)).await? {
        print_listed(out, &listed, |out, grant| {
            print_entry(out, &grant.tag, &grant.permissions)
        })?;
    }
    Ok(())
}
