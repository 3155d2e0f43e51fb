use std::sync::Arc;

use plotacl::{
    BackendError, Error, RegistryError, TagCache, backend::KvBackend, resolve_permissions,
};

use super::helpers::*;

async fn failing_registry() -> (Arc<FailingBackend>, plotacl::Registry) {
    let store = Arc::new(FailingBackend::default());
    let registry = registry_over(store.clone());
    seed_tag(&registry, "public", &["/pub/"]).await;
    seed_account(&registry, "alice", &["teamA"]).await;
    (store, registry)
}

#[tokio::test]
async fn test_mutations_surface_store_failures() {
    let (store, registry) = failing_registry().await;
    store.fail();

    let err = registry
        .create_account("bob", "pw", set(&[]))
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(matches!(
        err,
        Error::Backend(BackendError::Unavailable { .. })
    ));

    let err = registry
        .grant_tags("alice", &set(&["teamB"]))
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(!err.is_conflict());

    let err = registry.delete_accounts_with_prefix("al").await.unwrap_err();
    assert!(err.is_store_unavailable());

    let err = registry.define_tag("teamA", set(&["/a/"])).await.unwrap_err();
    assert!(err.is_store_unavailable());

    // Nothing was written while the store was failing
    let alice = store.inner.get("accounts/alice").await.unwrap().unwrap();
    assert!(!String::from_utf8(alice.value).unwrap().contains("teamB"));
    assert!(store.inner.get("accounts/bob").await.unwrap().is_none());
    assert!(store.inner.get("tagdefs/teamA").await.unwrap().is_none());
}

#[tokio::test]
async fn test_resolution_failure_keeps_store_error_kind() {
    let (store, registry) = failing_registry().await;
    let account = registry.account("alice").await.unwrap();
    store.fail();

    let err = registry.list_permissions("").await.unwrap_err();
    assert!(err.is_tag_resolution_error());
    assert!(err.is_store_unavailable());
    match &err {
        Error::Registry(RegistryError::TagResolution { tag, source }) => {
            assert_eq!(tag, "public");
            assert!(matches!(
                source.as_ref(),
                Error::Backend(BackendError::Unavailable { .. })
            ));
        }
        other => panic!("Unexpected error: {other:?}"),
    }

    let mut cache = TagCache::new();
    let err = resolve_permissions(&registry, &account, &mut cache)
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_store_failure_is_reported_by_commands() {
    let (store, registry) = failing_registry().await;
    store.fail();

    assert_eq!(
        run(&registry, "grant alice teamB").await,
        "Operation failed: Store unavailable: connection refused\n"
    );
}
