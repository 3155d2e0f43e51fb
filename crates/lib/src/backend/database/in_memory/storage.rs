//! Core storage operations for the InMemory store

use super::{InMemory, State};
use crate::backend::{Precondition, Revision, VersionedValue};

/// Stamps `value` with the next store revision and stores it.
fn write(state: &mut State, key: String, value: Vec<u8>) -> Revision {
    state.revision = Revision(state.revision.0 + 1);
    let revision = state.revision;
    state
        .records
        .insert(key, VersionedValue { value, revision });
    revision
}

/// Retrieves a record and its revision.
pub(crate) async fn get(backend: &InMemory, key: &str) -> Option<VersionedValue> {
    let state = backend.state.read().await;
    state.records.get(key).cloned()
}

/// Stores a record if the precondition holds.
///
/// The check and the write happen under one write lock, which is what makes
/// racing writers with the same stale revision resolve to a single winner.
pub(crate) async fn put_conditional(
    backend: &InMemory,
    key: &str,
    value: Vec<u8>,
    precondition: Precondition,
) -> bool {
    let mut state = backend.state.write().await;
    let current = state.records.get(key).map(|record| record.revision);

    let holds = match precondition {
        Precondition::Absent => current.is_none(),
        Precondition::Revision(expected) => current == Some(expected),
    };
    if !holds {
        return false;
    }

    write(&mut state, key.to_string(), value);
    true
}

/// Stores a record regardless of what is there.
pub(crate) async fn put_unconditional(backend: &InMemory, key: String, value: Vec<u8>) -> Revision {
    let mut state = backend.state.write().await;
    write(&mut state, key, value)
}

pub(crate) async fn delete(backend: &InMemory, key: &str) -> u64 {
    let mut state = backend.state.write().await;
    u64::from(state.records.remove(key).is_some())
}

pub(crate) async fn delete_prefix(backend: &InMemory, prefix: &str) -> u64 {
    let mut state = backend.state.write().await;
    let doomed: Vec<String> = state
        .records
        .range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, _)| key.clone())
        .collect();
    for key in &doomed {
        state.records.remove(key);
    }
    doomed.len() as u64
}

/// Returns matching records in key order.
pub(crate) async fn scan_prefix(backend: &InMemory, prefix: &str) -> Vec<(String, Vec<u8>)> {
    let state = backend.state.read().await;
    state
        .records
        .range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, record)| (key.clone(), record.value.clone()))
        .collect()
}
