use std::sync::Arc;

use plotacl::backend::{KvBackend, Precondition, database::InMemory};

use super::helpers::*;

#[tokio::test]
async fn test_same_stale_revision_commits_once() {
    let store = InMemory::new();
    store
        .put("accounts/alice", b"v1".to_vec(), Precondition::Absent)
        .await
        .unwrap();
    let revision = store.get("accounts/alice").await.unwrap().unwrap().revision;

    let first = store
        .put("accounts/alice", b"a".to_vec(), Precondition::Revision(revision))
        .await
        .unwrap();
    let second = store
        .put("accounts/alice", b"b".to_vec(), Precondition::Revision(revision))
        .await
        .unwrap();
    assert!(first);
    assert!(!second);
}

#[tokio::test]
async fn test_lost_race_reports_conflict_without_clobbering() {
    let store = Arc::new(InterferingBackend::default());
    let registry = registry_over(store.clone());
    seed_account(&registry, "alice", &["teamA"]).await;

    store.arm();
    let err = registry
        .grant_tags("alice", &set(&["teamB"]))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        err.to_string(),
        "Transaction for atomic update failed; try again"
    );
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "public"])
    );

    // A fresh attempt succeeds
    registry.grant_tags("alice", &set(&["teamB"])).await.unwrap();
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "teamB", "public"])
    );
}

#[tokio::test]
async fn test_conflicting_prefix_update_is_not_applied() {
    let store = Arc::new(InterferingBackend::default());
    let registry = registry_over(store.clone());
    seed_tag(&registry, "teamA", &["/bldg1/", "/bldg2/"]).await;

    store.arm();
    let err = registry
        .remove_prefixes("teamA", &set(&["/bldg1/"]))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes,
        set(&["/bldg1/", "/bldg2/"])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_grants_never_lose_committed_updates() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &[]).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let tag = format!("tag{i}");
            let result = registry.grant_tags("alice", &set(&[tag.as_str()])).await;
            (tag, result)
        }));
    }

    let mut committed = Vec::new();
    for handle in handles {
        let (tag, result) = handle.await.unwrap();
        match result {
            Ok(()) => committed.push(tag),
            Err(err) => assert!(err.is_conflict(), "unexpected error: {err}"),
        }
    }

    assert!(!committed.is_empty());
    let tags = registry.account("alice").await.unwrap().tags;
    for tag in &committed {
        assert!(tags.contains(tag), "committed grant of {tag} was lost");
    }
    assert_eq!(tags.len(), committed.len() + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_creates_commit_once() {
    let registry = setup_registry();

    let mut handles = Vec::new();
    for i in 0..4 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry
                .define_tag("teamA", set(&[format!("/site{i}/").as_str()]))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => created += 1,
            Err(err) => assert!(err.is_already_exists()),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(
        registry.tag_definition("teamA").await.unwrap().path_prefixes.len(),
        1
    );
}
