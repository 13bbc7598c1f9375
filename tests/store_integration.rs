//! Integration tests for the link store against both storage backends.

use linkbox::storage::{MemoryStorage, SqliteStorage, Storage};
use linkbox::store::{CreateAction, LinkStore, StoreError};
use std::sync::Arc;

fn memory_store() -> LinkStore {
    LinkStore::new(Arc::new(MemoryStorage::new()))
}

async fn sqlite_store() -> LinkStore {
    // A single connection so the in-memory database is shared.
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    LinkStore::new(Arc::new(storage))
}

#[tokio::test]
async fn create_then_resolve_counts_clicks() {
    let store = memory_store();

    let link = store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();
    assert_eq!(link.id, "abc");
    assert_eq!(link.clicks, 0);

    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.original_link, "https://example.com");
    assert_eq!(resolved.clicks, 1);

    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.clicks, 2);
}

#[tokio::test]
async fn create_allocates_id_when_absent() {
    let store = memory_store();

    let link = store.create(None, "https://example.com", None).await.unwrap();
    assert_eq!(link.id.len(), 7);
    assert!(link
        .id
        .bytes()
        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));

    let resolved = store.resolve(&link.id).await.unwrap();
    assert_eq!(resolved.original_link, "https://example.com");
}

#[tokio::test]
async fn reserved_ids_are_rejected_without_mutation() {
    let store = memory_store();

    for id in ["dashboard", "list", ".html"] {
        let err = store
            .create(Some(id), "https://example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::BadRequest));
    }

    let (items, count) = store.list(10).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn slashed_ids_are_rejected() {
    let store = memory_store();

    let err = store
        .create(Some("a/b"), "https://example.com", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::BadRequest));

    let (_, count) = store.list(10).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn malformed_urls_are_rejected() {
    let store = memory_store();

    for url in ["not a url", "javascript:alert(1)", ""] {
        let err = store.create(Some("abc"), url, None).await.unwrap_err();
        assert!(matches!(err, StoreError::BadRequest));
    }
}

#[tokio::test]
async fn lax_urls_are_accepted() {
    let store = memory_store();

    // Scheme-less and www-prefixed forms pass the permissive shape check.
    store.create(Some("a1"), "example.com", None).await.unwrap();
    store
        .create(Some("a2"), "www.example.com/path?q=1", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_create_conflicts_and_preserves_original() {
    let store = memory_store();

    store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();

    let err = store
        .create(Some("abc"), "https://other.com", None)
        .await
        .unwrap_err();
    match err {
        StoreError::Conflict { existing_link } => {
            assert_eq!(existing_link, "https://example.com");
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.original_link, "https://example.com");
}

#[tokio::test]
async fn modify_action_overwrites_target_only() {
    let store = memory_store();

    let original = store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();
    store.resolve("abc").await.unwrap();

    let updated = store
        .create(Some("abc"), "https://other.com", Some(CreateAction::Modify))
        .await
        .unwrap();
    assert_eq!(updated.original_link, "https://other.com");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.clicks, 1);

    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.original_link, "https://other.com");
    assert_eq!(resolved.clicks, 2);
}

#[tokio::test]
async fn update_overwrites_existing_link() {
    let store = memory_store();

    store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();
    store.resolve("abc").await.unwrap();

    let updated = store.update("abc", "https://other.com").await.unwrap();
    assert_eq!(updated.original_link, "https://other.com");
    assert_eq!(updated.clicks, 1);
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let store = memory_store();

    let err = store
        .update("missing", "https://example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    // Update never creates records.
    let (_, count) = store.list(10).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn delete_removes_record() {
    let store = memory_store();

    store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();
    store.delete("abc").await.unwrap();

    let err = store.resolve("abc").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn delete_missing_id_is_not_found() {
    let store = memory_store();

    let err = store.delete("missing-id").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn list_respects_limit_and_reports_total() {
    let store = memory_store();

    for (id, url) in [
        ("a", "https://example.com/1"),
        ("b", "https://example.com/2"),
        ("c", "https://example.com/3"),
    ] {
        store.create(Some(id), url, None).await.unwrap();
    }

    let (items, count) = store.list(1).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(count, 3);
    assert_eq!(items[0].id, "a");
}

#[tokio::test]
async fn list_clamps_negative_limit() {
    let store = memory_store();

    for id in ["a", "b"] {
        store
            .create(Some(id), "https://example.com", None)
            .await
            .unwrap();
    }

    let (items, count) = store.list(-1).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(count, 2);
}

#[tokio::test]
async fn sqlite_list_clamps_negative_limit() {
    let store = sqlite_store().await;

    for id in ["a", "b"] {
        store
            .create(Some(id), "https://example.com", None)
            .await
            .unwrap();
    }

    let (items, count) = store.list(-1).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(count, 2);
}

#[tokio::test]
async fn list_is_in_insertion_order() {
    let store = memory_store();

    for id in ["first", "second", "third"] {
        store
            .create(Some(id), "https://example.com", None)
            .await
            .unwrap();
    }

    // Overwriting a target must not move the record.
    store
        .update("first", "https://other.com")
        .await
        .unwrap();

    let (items, _) = store.list(10).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}

#[tokio::test]
async fn concurrent_resolves_lose_no_clicks() {
    let store = Arc::new(memory_store());

    store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.resolve("abc").await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (items, _) = store.list(1).await.unwrap();
    assert_eq!(items[0].clicks, 50);
}

#[tokio::test]
async fn concurrent_creates_have_a_single_winner() {
    let store = Arc::new(memory_store());

    let mut handles = Vec::new();
    for i in 0..2 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(Some("race"), &format!("https://example.com/{i}"), None)
                .await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(StoreError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 1);

    let (_, count) = store.list(10).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_backend_supports_the_same_semantics() {
    let store = sqlite_store().await;

    store
        .create(Some("abc"), "https://example.com", None)
        .await
        .unwrap();

    let err = store
        .create(Some("abc"), "https://other.com", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.clicks, 1);
    assert_eq!(resolved.original_link, "https://example.com");

    store
        .create(Some("abc"), "https://other.com", Some(CreateAction::Modify))
        .await
        .unwrap();
    let resolved = store.resolve("abc").await.unwrap();
    assert_eq!(resolved.original_link, "https://other.com");
    assert_eq!(resolved.clicks, 2);

    store.delete("abc").await.unwrap();
    let err = store.resolve("abc").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn sqlite_list_keeps_insertion_order_across_overwrites() {
    let store = sqlite_store().await;

    for id in ["first", "second", "third"] {
        store
            .create(Some(id), "https://example.com", None)
            .await
            .unwrap();
    }
    store.update("first", "https://other.com").await.unwrap();

    let (items, count) = store.list(10).await.unwrap();
    assert_eq!(count, 3);
    let ids: Vec<&str> = items.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["first", "second", "third"]);
}
