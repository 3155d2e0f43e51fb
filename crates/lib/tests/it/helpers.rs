use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use plotacl::{
    Backend, Registry, Result,
    backend::{BackendError, KvBackend, Precondition, VersionedValue, database::InMemory},
    commands,
    sets::to_set,
};

/// Creates a registry over a fresh in-memory store.
pub fn setup_registry() -> Registry {
    Registry::new(Backend::new(Arc::new(InMemory::new())))
}

/// Creates a registry over `store`, keeping the store handle for inspection.
pub fn registry_over(store: Arc<dyn KvBackend>) -> Registry {
    Registry::new(Backend::new(store))
}

/// Creates an account with password `pw`.
pub async fn seed_account(registry: &Registry, username: &str, tags: &[&str]) {
    registry
        .create_account(username, "pw", to_set(tags.iter().copied()))
        .await
        .expect("Failed to create account");
}

/// Defines a tag.
pub async fn seed_tag(registry: &Registry, tag: &str, prefixes: &[&str]) {
    registry
        .define_tag(tag, to_set(prefixes.iter().copied()))
        .await
        .expect("Failed to define tag");
}

pub fn set(items: &[&str]) -> HashSet<String> {
    to_set(items.iter().copied())
}

/// Runs one command line and returns everything it printed.
pub async fn run(registry: &Registry, line: &str) -> String {
    let mut out = Vec::new();
    commands::dispatch(registry, line, &mut out)
        .await
        .expect("Writing to a Vec cannot fail");
    String::from_utf8(out).expect("Command output is UTF-8")
}

/// Store wrapper counting reads.
#[derive(Default)]
pub struct CountingBackend {
    inner: InMemory,
    gets: AtomicUsize,
}

impl CountingBackend {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvBackend for CountingBackend {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        self.inner.put(key, value, precondition).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        self.inner.delete_prefix(prefix).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.inner.scan_prefix(prefix).await
    }
}

/// Store wrapper simulating another session that rewrites a record between
/// our read and our conditional write, once.
#[derive(Default)]
pub struct InterferingBackend {
    pub inner: InMemory,
    armed: AtomicBool,
}

impl InterferingBackend {
    /// Make the next conditional update lose its race.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl KvBackend for InterferingBackend {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        if matches!(precondition, Precondition::Revision(_))
            && self.armed.swap(false, Ordering::SeqCst)
        {
            // The other session writes the same bytes back, which still bumps the revision
            if let Some(current) = self.inner.get(key).await? {
                self.inner.put_raw(key, current.value).await;
            }
        }
        self.inner.put(key, value, precondition).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        self.inner.delete_prefix(prefix).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.inner.scan_prefix(prefix).await
    }
}

/// Store wrapper whose point reads and writes fail once `fail` is called.
///
/// Scans keep working so that listings reach the per-record lookups.
#[derive(Default)]
pub struct FailingBackend {
    pub inner: InMemory,
    failing: AtomicBool,
}

impl FailingBackend {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable {
                reason: "connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl KvBackend for FailingBackend {
    async fn get(&self, key: &str) -> Result<Option<VersionedValue>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>, precondition: Precondition) -> Result<bool> {
        self.check()?;
        self.inner.put(key, value, precondition).await
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64> {
        self.check()?;
        self.inner.delete_prefix(prefix).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.inner.scan_prefix(prefix).await
    }
}
