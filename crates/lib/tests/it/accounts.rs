use super::helpers::*;

#[tokio::test]
async fn test_account_lifecycle_scenario() {
    let registry = setup_registry();

    registry
        .create_account("alice", "pw1", set(&["teamA"]))
        .await
        .unwrap();
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "public"])
    );

    registry.grant_tags("alice", &set(&["teamB"])).await.unwrap();
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "teamB", "public"])
    );

    let outcome = registry
        .revoke_tags("alice", &set(&["teamA", "public"]))
        .await
        .unwrap();
    assert!(outcome.public_retained);
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamB", "public"])
    );
}

#[tokio::test]
async fn test_create_existing_account_fails() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &["teamA"]).await;

    let err = registry
        .create_account("alice", "other", set(&["teamB"]))
        .await
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(err.to_string(), "Already exists");

    // The original record is untouched
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "public"])
    );
    registry.check_password("alice", "pw").await.unwrap();
}

#[tokio::test]
async fn test_set_and_check_password() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &[]).await;

    registry.set_password("alice", "new-secret").await.unwrap();
    registry.check_password("alice", "new-secret").await.unwrap();

    let err = registry.check_password("alice", "pw").await.unwrap_err();
    assert_eq!(err.kind(), plotacl::ErrorKind::Credential);

    // Tags survive a password change
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["public"])
    );
}

#[tokio::test]
async fn test_mutating_missing_account_is_not_found() {
    let registry = setup_registry();

    assert!(
        registry
            .set_password("ghost", "pw")
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        registry
            .grant_tags("ghost", &set(&["teamA"]))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        registry
            .revoke_tags("ghost", &set(&["teamA"]))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(registry.account("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_revoke_never_removes_public() {
    let registry = setup_registry();
    let requests: [&[&str]; 4] = [
        &["public", "teamA"],
        &["teamA", "teamB", "public"],
        &["nope", "public"],
        &["public", "public", "teamB"],
    ];

    for (i, request) in requests.iter().enumerate() {
        let username = format!("user{i}");
        seed_account(&registry, &username, &["teamA", "teamB"]).await;
        registry
            .revoke_tags(&username, &set(request))
            .await
            .unwrap();
        assert!(
            registry
                .account(&username)
                .await
                .unwrap()
                .tags
                .contains("public")
        );
    }
}

#[tokio::test]
async fn test_revoke_only_public_is_rejected() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &["teamA"]).await;

    let err = registry
        .revoke_tags("alice", &set(&["public"]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_operation());
    assert_eq!(
        err.to_string(),
        "All user accounts must be assigned the \"public\" tag"
    );
    assert_eq!(
        registry.account("alice").await.unwrap().tags,
        set(&["teamA", "public"])
    );
}

#[tokio::test]
async fn test_grant_undefined_tag_is_allowed() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &[]).await;

    registry
        .grant_tags("alice", &set(&["not-defined-yet"]))
        .await
        .unwrap();
    assert!(
        registry
            .account("alice")
            .await
            .unwrap()
            .tags
            .contains("not-defined-yet")
    );
}

#[tokio::test]
async fn test_delete_account_is_idempotent() {
    let registry = setup_registry();
    seed_account(&registry, "alice", &[]).await;

    assert_eq!(registry.delete_account("alice").await.unwrap(), 1);
    assert_eq!(registry.delete_account("alice").await.unwrap(), 0);
    assert!(registry.account("alice").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_accounts_with_prefix() {
    let registry = setup_registry();
    for username in ["alice", "albert", "bob"] {
        seed_account(&registry, username, &[]).await;
    }
    seed_tag(&registry, "alpha", &["/a/"]).await;

    assert_eq!(registry.delete_accounts_with_prefix("al").await.unwrap(), 2);
    assert_eq!(registry.delete_accounts_with_prefix("al").await.unwrap(), 0);

    registry.account("bob").await.unwrap();
    // Tag definitions sharing the prefix are a different kind of record
    registry.tag_definition("alpha").await.unwrap();
}
