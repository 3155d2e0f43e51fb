//! Backend wrapper applying the deployment key namespace
//!
//! Several independent configurations may share one store. Each is isolated
//! by a key prefix that is applied to every key on the way in and stripped
//! from scan results on the way out, so the registry only ever sees its own
//! logical keys.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    Result,
    backend::{BackendError, KvBackend, Precondition, VersionedValue},
};

/// Namespaced handle to a [`KvBackend`].
///
/// Cloning is cheap; clones share the underlying store.
#[derive(Clone)]
pub struct Backend {
    backend_impl: Arc<dyn KvBackend>,
    namespace: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// Create a new Backend wrapping a store with no namespace.
    pub fn new(backend_impl: Arc<dyn KvBackend>) -> Self {
        Self {
            backend_impl,
            namespace: String::new(),
            timeout: None,
        }
    }

    /// Isolate this handle under `namespace`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Bound every store call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn physical(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(after) => match tokio::time::timeout(after, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(?after, "store call timed out");
                    Err(BackendError::Timeout { after }.into())
                }
            },
            None => call.await,
        }
    }

    /// Read a record by logical key.
    pub async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        let key = self.physical(key);
        self.bounded(self.backend_impl.get(&key)).await
    }

    /// Conditionally write a record by logical key.
    pub async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        let key = self.physical(key);
        self.bounded(self.backend_impl.put(&key, value, precondition))
            .await
    }

    /// Delete a record by logical key.
    pub async fn delete(&self, key: &str) -> Result<u64> {
        let key = self.physical(key);
        self.bounded(self.backend_impl.delete(&key)).await
    }

    /// Delete every record under a logical key prefix.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        let prefix = self.physical(prefix);
        self.bounded(self.backend_impl.delete_prefix(&prefix)).await
    }

    /// Scan a logical key prefix. Returned keys are logical.
    pub async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let physical = self.physical(prefix);
        let records = self.bounded(self.backend_impl.scan_prefix(&physical)).await?;
        Ok(records
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(self.namespace.as_str())
                    .map(|logical| (logical.to_string(), value))
            })
            .collect())
    }
}
