use std::collections::HashSet;
use std::sync::Arc;

use plotacl::{Permissions, backend::database::InMemory};

use super::helpers::*;

#[tokio::test]
async fn test_define_and_modify_tag() {
    let registry = setup_registry();
    seed_tag(&registry, "teamA", &["/bldg1/"]).await;

    registry
        .add_prefixes("teamA", &set(&["/bldg2/", "/bldg1/"]))
        .await
        .unwrap();
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes,
        set(&["/bldg1/", "/bldg2/"])
    );

    registry
        .remove_prefixes("teamA", &set(&["/bldg1/", "/unknown/"]))
        .await
        .unwrap();
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes,
        set(&["/bldg2/"])
    );
}

#[tokio::test]
async fn test_define_existing_tag_fails() {
    let registry = setup_registry();
    seed_tag(&registry, "teamA", &["/bldg1/"]).await;

    let err = registry
        .define_tag("teamA", set(&["/other/"]))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes,
        set(&["/bldg1/"])
    );
}

#[tokio::test]
async fn test_define_empty_tag_is_rejected() {
    let registry = setup_registry();
    let err = registry
        .define_tag("teamA", HashSet::new())
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());
    assert!(registry.tag_definition("teamA").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_remove_last_prefix_leaves_storage_unchanged() {
    let store = Arc::new(InMemory::new());
    let registry = registry_over(store.clone());
    seed_tag(&registry, "teamA", &["/bldg1/"]).await;
    let revision = store.current_revision().await;

    let err = registry
        .remove_prefixes("teamA", &set(&["/bldg1/"]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());
    assert_eq!(
        err.to_string(),
        "Each tag must be assigned at least one prefix (use undeftag or undeftags to fully remove a tag)"
    );

    assert_eq!(store.current_revision().await, revision);
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes,
        set(&["/bldg1/"])
    );
}

#[tokio::test]
async fn test_reserved_all_tag_is_protected() {
    let store = Arc::new(InMemory::new());
    let registry = registry_over(store.clone());

    let err = registry
        .define_tag("all", set(&["/x/"]))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    let err = registry
        .add_prefixes("all", &set(&["/x/"]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());
    assert_eq!(err.to_string(), "Cannot modify definition of \"all\" tag");

    let err = registry
        .remove_prefixes("all", &set(&["/x/"]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());

    let err = registry.delete_tag("all").await.unwrap_err();
    assert!(err.is_invalid_operation());

    // Nothing was ever written
    assert!(store.all_keys().await.is_empty());
}

#[tokio::test]
async fn test_tag_grant_handles_all() {
    let registry = setup_registry();
    seed_tag(&registry, "teamA", &["/bldg1/"]).await;

    let grant = registry.tag_grant("all").await.unwrap();
    assert_eq!(grant.permissions, Permissions::AllStreams);

    let grant = registry.tag_grant("teamA").await.unwrap();
    assert_eq!(
        grant.permissions,
        Permissions::Prefixes(set(&["/bldg1/"]))
    );

    assert!(registry.tag_grant("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_modify_missing_tag_is_not_found() {
    let registry = setup_registry();
    assert!(
        registry
            .add_prefixes("ghost", &set(&["/a/"]))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        registry
            .remove_prefixes("ghost", &set(&["/a/"]))
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_delete_tags() {
    let registry = setup_registry();
    for tag in ["teamA", "teamB", "other"] {
        seed_tag(&registry, tag, &["/x/"]).await;
    }

    assert_eq!(registry.delete_tag("other").await.unwrap(), 1);
    assert_eq!(registry.delete_tag("other").await.unwrap(), 0);
    assert_eq!(registry.delete_tags_with_prefix("team").await.unwrap(), 2);

    let listed = registry.list_tag_definitions("").await.unwrap();
    // Only the virtual `all` tag remains
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_corrupt_definition_is_never_overwritten() {
    let store = Arc::new(InMemory::new());
    let registry = registry_over(store.clone());
    store
        .put_raw("tagdefs/teamA", r#"{"tag":"teamA","path_prefixes":null}"#)
        .await;

    let err = registry
        .add_prefixes("teamA", &set(&["/a/"]))
        .await
        .unwrap_err();
    assert!(err.is_corrupt());
}
