//! Tag definition operations
//!
//! The reserved `all` tag is never stored. Each operation decides what `all`
//! means for it before touching the store.

use std::collections::HashSet;

use super::{
    Registry,
    atomic::{self, Versioned},
    errors::RegistryError,
    record_name, tag_key,
};
use crate::{
    Result,
    constants::{ALL_TAG, TAGDEFS_NAMESPACE},
    model::{Listed, TagDefinition, TagGrant, TagRef, tag::decode_tag_definition},
};

fn reserved(operation: &'static str) -> RegistryError {
    RegistryError::ReservedTag {
        tag: ALL_TAG.to_string(),
        operation,
    }
}

impl Registry {
    async fn load_tag_definition(&self, tag: &str) -> Result<Versioned<TagDefinition>> {
        atomic::load(&self.backend, &tag_key(tag), |raw| {
            decode_tag_definition(tag, raw)
        })
        .await?
        .ok_or_else(|| {
            RegistryError::TagNotFound {
                tag: tag.to_string(),
            }
            .into()
        })
    }

    /// Define a new tag granting `prefixes`.
    ///
    /// # Errors
    /// - `TagAlreadyExists` if the tag is defined, or is `all`
    /// - `EmptyPrefixSet` if `prefixes` is empty
    pub async fn define_tag(&self, tag: &str, prefixes: HashSet<String>) -> Result<()> {
        if let TagRef::All = TagRef::parse(tag) {
            return Err(RegistryError::TagAlreadyExists {
                tag: tag.to_string(),
            }
            .into());
        }

        let definition = TagDefinition::new(tag, prefixes)?;
        atomic::commit_create(
            &self.backend,
            &tag_key(tag),
            definition.encode()?,
            || RegistryError::TagAlreadyExists {
                tag: tag.to_string(),
            },
        )
        .await
    }

    /// Add prefixes to a tag definition.
    pub async fn add_prefixes(&self, tag: &str, prefixes: &HashSet<String>) -> Result<()> {
        let TagRef::Named(tag) = TagRef::parse(tag) else {
            return Err(reserved("modify definition of").into());
        };

        let Versioned {
            value: mut definition,
            revision,
        } = self.load_tag_definition(tag).await?;
        definition.add_prefixes(prefixes);
        atomic::commit_update(&self.backend, &tag_key(tag), definition.encode()?, revision).await
    }

    /// Remove prefixes from a tag definition.
    ///
    /// A removal that would leave the tag with no prefixes is rejected before
    /// anything is written.
    pub async fn remove_prefixes(&self, tag: &str, prefixes: &HashSet<String>) -> Result<()> {
        let TagRef::Named(tag) = TagRef::parse(tag) else {
            return Err(reserved("modify definition of").into());
        };

        let Versioned {
            value: mut definition,
            revision,
        } = self.load_tag_definition(tag).await?;
        definition.remove_prefixes(prefixes)?;
        atomic::commit_update(&self.backend, &tag_key(tag), definition.encode()?, revision).await
    }

    /// Delete a tag definition. Returns how many were removed (0 or 1).
    ///
    /// Accounts that still reference the tag are left alone; resolving their
    /// permissions fails until the tag is redefined or revoked.
    pub async fn delete_tag(&self, tag: &str) -> Result<u64> {
        let TagRef::Named(tag) = TagRef::parse(tag) else {
            return Err(reserved("delete").into());
        };

        let deleted = self.backend.delete(&tag_key(tag)).await?;
        tracing::info!(tag, deleted, "deleted tag definition");
        Ok(deleted)
    }

    /// Delete every tag definition whose name starts with `prefix`.
    pub async fn delete_tags_with_prefix(&self, prefix: &str) -> Result<u64> {
        let count = self.backend.delete_prefix(&tag_key(prefix)).await?;
        tracing::info!(prefix, count, "deleted tag definitions by prefix");
        Ok(count)
    }

    /// Look up one stored tag definition.
    ///
    /// `all` has no stored definition; use [`Registry::tag_grant`] to look
    /// up any tag including it.
    pub async fn tag_definition(&self, tag: &str) -> Result<TagDefinition> {
        Ok(self.load_tag_definition(tag).await?.value)
    }

    /// What a tag grants, including the virtual `all` tag.
    pub async fn tag_grant(&self, tag: &str) -> Result<TagGrant> {
        match TagRef::parse(tag) {
            TagRef::All => Ok(TagGrant::all()),
            TagRef::Named(tag) => Ok(self.tag_definition(tag).await?.into()),
        }
    }

    /// List every tag whose name starts with `prefix`, ordered by name.
    ///
    /// The virtual `all` tag comes first whenever it matches `prefix`. A
    /// stored record under the reserved name is ignored.
    pub async fn list_tag_definitions(&self, prefix: &str) -> Result<Vec<Listed<TagGrant>>> {
        let records = self.backend.scan_prefix(&tag_key(prefix)).await?;

        let mut listed = Vec::with_capacity(records.len() + 1);
        if ALL_TAG.starts_with(prefix) {
            listed.push(Listed::Record(TagGrant::all()));
        }
        for (key, raw) in &records {
            let tag = record_name(TAGDEFS_NAMESPACE, key);
            if tag == ALL_TAG {
                tracing::warn!(key = %key, "ignoring stored record for the reserved tag");
                continue;
            }
            let definition = decode_tag_definition(tag, raw);
            if definition.is_corrupt() {
                tracing::warn!(key = %key, "corrupt tag definition record");
            }
            listed.push(definition.map(TagGrant::from));
        }
        Ok(listed)
    }
}
