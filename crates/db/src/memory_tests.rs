use super::*;
use serde_json::json;

fn insert(collection: Collection, id: &str, body: Value) -> WriteOp {
    let mut record = json!({ "id": id });
    merge_patch(&mut record, &body);
    WriteOp::Insert { collection, record }
}

#[tokio::test]
async fn test_insert_and_select_in_insertion_order() {
    let store = MemoryStore::new();
    store
        .insert(Collection::Accounts, json!({"id": "b", "code": "2100"}))
        .await
        .unwrap();
    store
        .insert(Collection::Accounts, json!({"id": "a", "code": "1100"}))
        .await
        .unwrap();

    let rows = store.select_all(Collection::Accounts, None).await.unwrap();
    let ids: Vec<_> = rows.iter().filter_map(document_id).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let filter = Filter::new().where_eq("code", "1100");
    let rows = store
        .select_all(Collection::Accounts, Some(&filter))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_update_merges_patch() {
    let store = MemoryStore::new();
    store
        .insert(
            Collection::Submissions,
            json!({"id": "s1", "customer": "A", "bc_document_number": "x"}),
        )
        .await
        .unwrap();
    store
        .update_by_id(
            Collection::Submissions,
            "s1",
            json!({"customer": "B", "bc_document_number": null}),
        )
        .await
        .unwrap();

    let doc = store
        .find_by_id(Collection::Submissions, "s1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc, json!({"id": "s1", "customer": "B"}));
}

#[tokio::test]
async fn test_failed_batch_leaves_store_untouched() {
    let store = MemoryStore::new();
    store
        .insert(Collection::Inventory, json!({"id": "i1", "current_stock": "10"}))
        .await
        .unwrap();

    let result = store
        .apply_batch(vec![
            WriteOp::Update {
                collection: Collection::Inventory,
                id: "i1".to_string(),
                patch: json!({"current_stock": "0"}),
            },
            insert(Collection::MutationLogs, "m1", json!({})),
            WriteOp::Update {
                collection: Collection::Submissions,
                id: "missing".to_string(),
                patch: json!({}),
            },
        ])
        .await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));

    let doc = store
        .find_by_id(Collection::Inventory, "i1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["current_stock"], "10");
    assert!(
        store
            .select_all(Collection::MutationLogs, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_duplicate_and_missing_id_rejected() {
    let store = MemoryStore::new();
    store
        .insert(Collection::Accounts, json!({"id": "a"}))
        .await
        .unwrap();
    assert!(matches!(
        store.insert(Collection::Accounts, json!({"id": "a"})).await,
        Err(StoreError::Duplicate { .. })
    ));
    assert!(matches!(
        store.insert(Collection::Accounts, json!({"code": "1"})).await,
        Err(StoreError::MissingId(Collection::Accounts))
    ));
}

#[tokio::test]
async fn test_patch_cannot_change_id() {
    let store = MemoryStore::new();
    store
        .insert(Collection::Accounts, json!({"id": "a"}))
        .await
        .unwrap();
    let result = store
        .update_by_id(Collection::Accounts, "a", json!({"id": "b"}))
        .await;
    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[tokio::test]
async fn test_snapshot_reads_several_collections() {
    let store = MemoryStore::new();
    store
        .apply_batch(vec![
            insert(Collection::Accounts, "a1", json!({})),
            insert(Collection::JournalEntries, "j1", json!({})),
            insert(Collection::JournalEntries, "j2", json!({})),
        ])
        .await
        .unwrap();

    let snapshot = store
        .snapshot(&[Collection::Accounts, Collection::JournalEntries])
        .await
        .unwrap();
    assert_eq!(snapshot.get(Collection::Accounts).len(), 1);
    assert_eq!(snapshot.get(Collection::JournalEntries).len(), 2);
    assert!(snapshot.get(Collection::Inventory).is_empty());
}

#[tokio::test]
async fn test_snapshot_file_round_trip() {
    let path = std::env::temp_dir().join(format!("tppb-store-{}.json", uuid::Uuid::now_v7()));

    let store = MemoryStore::open(&path).await.unwrap();
    store
        .insert(Collection::Accounts, json!({"id": "a1", "code": "1100"}))
        .await
        .unwrap();
    drop(store);

    let reopened = MemoryStore::open(&path).await.unwrap();
    let doc = reopened
        .find_by_id(Collection::Accounts, "a1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc["code"], "1100");
    assert_eq!(reopened.snapshot_path(), Some(path.as_path()));

    tokio::fs::remove_file(&path).await.unwrap();
}
