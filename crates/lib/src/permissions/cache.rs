//! Tag lookup cache for a single resolution pass
//!
//! A bulk listing resolves many accounts that mostly share the same handful
//! of tags. The cache holds each tag's prefix set after its first lookup so
//! that a pass reads every distinct tag from the store at most once.

use std::collections::{HashMap, HashSet};

use crate::{Result, registry::Registry};

/// Prefix sets of the tags looked up so far, keyed by tag name.
///
/// Failed lookups are not cached. Create one per pass and drop it afterwards;
/// entries are never invalidated.
#[derive(Debug, Default)]
pub struct TagCache {
    entries: HashMap<String, HashSet<String>>,
    lookups: usize,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store lookups performed through this cache.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Number of distinct tags currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The prefixes granted by a named tag, reading the store on a miss.
    pub(crate) async fn prefixes(
        &mut self,
        registry: &Registry,
        tag: &str,
    ) -> Result<&HashSet<String>> {
        if !self.entries.contains_key(tag) {
            self.lookups += 1;
            tracing::debug!(tag, "tag cache miss");
            let definition = registry.tag_definition(tag).await?;
            self.entries
                .insert(tag.to_string(), definition.path_prefixes);
        }
        Ok(&self.entries[tag])
    }
}
