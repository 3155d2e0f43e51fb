//! Persistence operations for the InMemory store
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory store state to/from JSON files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{InMemory, State};
use crate::{
    Error, Result,
    backend::{Revision, VersionedValue, errors::BackendError},
};

/// The current persistence file format version.
const PERSISTENCE_VERSION: u8 = 0;

/// Serializable form of the store.
///
/// Values are stored as UTF-8 text when possible so that the file stays
/// readable; anything else is kept as a byte array.
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default)]
    version: u8,
    revision: Revision,
    records: BTreeMap<String, SerializableRecord>,
}

#[derive(Serialize, Deserialize)]
struct SerializableRecord {
    value: StoredValue,
    revision: Revision,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        match std::str::from_utf8(value) {
            Ok(text) => StoredValue::Text(text.to_string()),
            Err(_) => StoredValue::Bytes(value.to_vec()),
        }
    }
}

impl From<StoredValue> for Vec<u8> {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Text(text) => text.into_bytes(),
            StoredValue::Bytes(bytes) => bytes,
        }
    }
}

/// Saves all records to a specified file as JSON.
///
/// The file is written next to its destination and renamed into place, so
/// readers never observe a partially written store.
///
/// # Arguments
/// * `backend` - The InMemory store to save
/// * `path` - The path to the file where the state should be saved.
pub(crate) async fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let serializable = {
        let state = backend.state.read().await;
        SerializableStore {
            version: PERSISTENCE_VERSION,
            revision: state.revision,
            records: state
                .records
                .iter()
                .map(|(key, record)| {
                    (
                        key.clone(),
                        SerializableRecord {
                            value: StoredValue::from(record.value.as_slice()),
                            revision: record.revision,
                        },
                    )
                })
                .collect(),
        }
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    let path = path.as_ref();
    let mut staging = path.as_os_str().to_os_string();
    staging.push(".tmp");
    tokio::fs::write(&staging, json)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })?;
    tokio::fs::rename(&staging, path)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads the store from a specified JSON file.
///
/// If the file does not exist, a new, empty `InMemory` store is returned.
pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(InMemory::new()),
        Err(e) => return Err(BackendError::FileIo { source: e }.into()),
    };

    let serializable: SerializableStore = serde_json::from_str(&json)
        .map_err(|e| -> Error { BackendError::DeserializationFailed { source: e }.into() })?;
    if serializable.version != PERSISTENCE_VERSION {
        return Err(BackendError::UnsupportedVersion {
            found: serializable.version,
            supported: PERSISTENCE_VERSION,
        }
        .into());
    }

    let records = serializable
        .records
        .into_iter()
        .map(|(key, record)| {
            (
                key,
                VersionedValue {
                    value: record.value.into(),
                    revision: record.revision,
                },
            )
        })
        .collect();

    Ok(InMemory {
        state: RwLock::new(State {
            records,
            revision: serializable.revision,
        }),
    })
}
