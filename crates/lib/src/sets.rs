//! Conversions between ordered token lists and unique unordered name sets.
//!
//! Tag sets and prefix sets are stored as `HashSet<String>`; commands receive
//! them as token slices. The helpers here are the only place the two shapes
//! meet.

use std::collections::HashSet;

/// Collects items into a set, dropping duplicates.
pub fn to_set<I, S>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Returns the members of a set as a list.
///
/// The order is lexicographic so that rendered output is stable, but callers
/// should only rely on membership.
pub fn to_sequence(items: &HashSet<String>) -> Vec<String> {
    let mut sequence: Vec<String> = items.iter().cloned().collect();
    sequence.sort_unstable();
    sequence
}

/// Renders a set as space-separated names.
pub fn join(items: &HashSet<String>) -> String {
    to_sequence(items).join(" ")
}
