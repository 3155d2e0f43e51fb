//! Tag definitions, tag references and resolved permissions

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Listed, errors::ModelError};
use crate::{
    Result,
    constants::{ALL_STREAMS_SYMBOL, ALL_TAG},
    sets,
};

/// A tag name as seen by resolution and mutation paths.
///
/// The reserved `all` tag is never stored, so every path that touches the
/// store matches on this first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagRef<'a> {
    /// The virtual universal-access tag
    All,
    /// An admin-defined tag
    Named(&'a str),
}

impl<'a> TagRef<'a> {
    pub fn parse(name: &'a str) -> Self {
        if name == ALL_TAG {
            TagRef::All
        } else {
            TagRef::Named(name)
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            TagRef::All => ALL_TAG,
            TagRef::Named(name) => name,
        }
    }
}

/// A stored tag definition: a named bundle of collection-path prefixes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    /// Unique tag name (primary key)
    pub tag: String,

    /// Collection-path prefixes granted by this tag; never empty
    pub path_prefixes: HashSet<String>,
}

impl TagDefinition {
    /// Build a definition, rejecting an empty prefix set.
    pub fn new(tag: impl Into<String>, path_prefixes: HashSet<String>) -> Result<Self> {
        let tag = tag.into();
        if path_prefixes.is_empty() {
            return Err(ModelError::EmptyPrefixSet { tag }.into());
        }
        Ok(Self { tag, path_prefixes })
    }

    /// Add prefixes. Prefixes already present are left alone.
    pub fn add_prefixes(&mut self, prefixes: &HashSet<String>) {
        self.path_prefixes.extend(prefixes.iter().cloned());
    }

    /// Remove prefixes, rejecting a removal that would leave none.
    ///
    /// On rejection the definition is left unchanged.
    pub fn remove_prefixes(&mut self, prefixes: &HashSet<String>) -> Result<()> {
        if self.path_prefixes.iter().all(|prefix| prefixes.contains(prefix)) {
            return Err(ModelError::EmptyPrefixSet {
                tag: self.tag.clone(),
            }
            .into());
        }
        self.path_prefixes.retain(|prefix| !prefixes.contains(prefix));
        Ok(())
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|source| ModelError::Encoding { source }.into())
    }
}

#[derive(Deserialize)]
struct TagDefinitionRecord {
    tag: Option<String>,
    path_prefixes: Option<HashSet<String>>,
}

/// Decode a stored tag definition, reporting malformed records as corrupt.
///
/// An empty prefix set can only come from a writer that bypassed the
/// registry, so it is treated as corrupt too.
pub(crate) fn decode_tag_definition(tag: &str, raw: &[u8]) -> Listed<TagDefinition> {
    match serde_json::from_slice::<TagDefinitionRecord>(raw) {
        Ok(TagDefinitionRecord {
            tag: stored,
            path_prefixes: Some(path_prefixes),
        }) if !path_prefixes.is_empty() && stored.as_deref().is_none_or(|stored| stored == tag) => {
            Listed::Record(TagDefinition {
                tag: tag.to_string(),
                path_prefixes,
            })
        }
        _ => Listed::Corrupt {
            name: tag.to_string(),
        },
    }
}

/// The streams an account or a tag makes visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Permissions {
    /// Every stream, granted by the `all` tag
    AllStreams,
    /// Streams whose collection path starts with one of these prefixes
    Prefixes(HashSet<String>),
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::Prefixes(HashSet::new())
    }
}

impl Permissions {
    /// Whether a collection path is visible.
    pub fn allows(&self, collection: &str) -> bool {
        match self {
            Permissions::AllStreams => true,
            Permissions::Prefixes(prefixes) => prefixes
                .iter()
                .any(|prefix| collection.starts_with(prefix.as_str())),
        }
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permissions::AllStreams => f.write_str(ALL_STREAMS_SYMBOL),
            Permissions::Prefixes(prefixes) => f.write_str(&sets::join(prefixes)),
        }
    }
}

/// What a single tag grants, including the virtual `all` tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagGrant {
    pub tag: String,
    pub permissions: Permissions,
}

impl TagGrant {
    pub(crate) fn all() -> Self {
        Self {
            tag: ALL_TAG.to_string(),
            permissions: Permissions::AllStreams,
        }
    }
}

impl From<TagDefinition> for TagGrant {
    fn from(definition: TagDefinition) -> Self {
        Self {
            tag: definition.tag,
            permissions: Permissions::Prefixes(definition.path_prefixes),
        }
    }
}
