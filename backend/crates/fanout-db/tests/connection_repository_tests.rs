mod common;

use common::{create_test_pool, create_test_store, generate_ids};

use fanout_config::RegistryConfig;
use fanout_core::ConnectionId;
use fanout_db::{
    ConnectionStore, DbError, RegistryScan, ScanCursor, SqliteConnectionStore,
    create_registry_pool,
};

use std::collections::HashSet;
use std::sync::Arc;

use googletest::prelude::*;
use googletest::matchers::is_empty as empty;

#[tokio::test]
async fn given_new_id_when_inserted_then_registry_counts_it() {
    // Given
    let store = create_test_store().await;
    let id = ConnectionId::generate();

    // When
    store.insert(&id).await.unwrap();

    // Then
    assert_that!(store.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_existing_id_when_inserted_again_then_registry_is_unchanged() {
    // Given
    let store = create_test_store().await;
    let id = ConnectionId::generate();
    store.insert(&id).await.unwrap();

    // When
    let result = store.insert(&id).await;

    // Then
    assert_that!(result, ok(anything()));
    assert_that!(store.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_absent_id_when_deleted_then_succeeds() {
    // Given
    let store = create_test_store().await;

    // When
    let result = store.delete(&ConnectionId::generate()).await;

    // Then
    assert_that!(result, ok(anything()));
}

#[tokio::test]
async fn given_registered_id_when_deleted_twice_then_both_succeed_and_id_is_gone() {
    // Given
    let store = create_test_store().await;
    let keep = ConnectionId::generate();
    let gone = ConnectionId::generate();
    store.insert(&keep).await.unwrap();
    store.insert(&gone).await.unwrap();

    // When
    store.delete(&gone).await.unwrap();
    store.delete(&gone).await.unwrap();

    // Then
    let page = store.scan_page(None, 10).await.unwrap();
    assert_eq!(page.ids, vec![keep]);
    assert_that!(page.next, none());
}

#[tokio::test]
async fn given_more_ids_than_page_size_when_scanning_then_every_id_appears_exactly_once() {
    // Given
    let store = Arc::new(create_test_store().await);
    let ids = generate_ids(23);
    for id in &ids {
        store.insert(id).await.unwrap();
    }

    // When
    let mut scan = RegistryScan::new(store.clone(), 5);
    let mut seen = Vec::new();
    while let Some(page) = scan.next_page().await.unwrap() {
        assert_that!(page.len(), le(5));
        seen.extend(page);
    }

    // Then
    let unique: HashSet<_> = seen.iter().cloned().collect();
    assert_that!(seen.len(), eq(23));
    assert_that!(unique.len(), eq(23));
    assert_eq!(unique, ids.into_iter().collect::<HashSet<_>>());
    assert_that!(scan.pages_fetched(), eq(5));
}

#[tokio::test]
async fn given_exact_multiple_of_page_size_when_scanning_then_final_page_request_returns_none() {
    // Given
    let store = create_test_store().await;
    for id in generate_ids(4) {
        store.insert(&id).await.unwrap();
    }

    // When
    let first = store.scan_page(None, 2).await.unwrap();
    let second = store.scan_page(first.next.as_ref(), 2).await.unwrap();
    let third = store.scan_page(second.next.as_ref(), 2).await.unwrap();

    // Then
    assert_that!(first.ids.len(), eq(2));
    assert_that!(second.ids.len(), eq(2));
    assert_that!(third.ids, empty());
    assert_that!(third.next, none());
}

#[tokio::test]
async fn given_cursor_past_last_id_when_scanning_then_returns_empty_page() {
    // Given
    let store = create_test_store().await;
    store
        .insert(&ConnectionId::parse("aaaa").unwrap())
        .await
        .unwrap();

    // When
    let page = store
        .scan_page(Some(&ScanCursor::new("zzzz")), 10)
        .await
        .unwrap();

    // Then
    assert_that!(page.ids, empty());
    assert_that!(page.next, none());
}

#[tokio::test]
async fn given_custom_table_name_when_used_then_rows_land_in_that_table() {
    // Given
    let pool = create_test_pool().await;
    let store = SqliteConnectionStore::new(pool.clone(), "live_sockets")
        .await
        .unwrap();
    let id = ConnectionId::generate();

    // When
    store.insert(&id).await.unwrap();

    // Then
    let stored: String = sqlx::query_scalar(r#"SELECT connection_id FROM "live_sockets""#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, id.as_str());
    assert_eq!(store.table_name(), "live_sockets");
}

#[tokio::test]
async fn given_hostile_table_name_when_creating_store_then_rejected() {
    // Given
    let pool = create_test_pool().await;

    // When
    let result = SqliteConnectionStore::new(pool, "connections; DROP TABLE x").await;

    // Then
    assert!(matches!(result, Err(DbError::InvalidTableName { .. })));
}

#[tokio::test]
async fn given_existing_table_when_store_recreated_then_rows_survive() {
    // Given
    let pool = create_test_pool().await;
    let first = SqliteConnectionStore::new(pool.clone(), "connections")
        .await
        .unwrap();
    first.insert(&ConnectionId::generate()).await.unwrap();

    // When
    let second = SqliteConnectionStore::new(pool, "connections").await.unwrap();

    // Then
    assert_that!(second.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_file_path_in_missing_directory_when_pool_created_then_database_is_usable() {
    // Given
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("nested").join("registry.db");
    let config = RegistryConfig::default();

    // When
    let store = SqliteConnectionStore::connect(&db_path, &config)
        .await
        .unwrap();
    store.insert(&ConnectionId::generate()).await.unwrap();

    // Then
    assert_that!(db_path.exists(), eq(true));
    assert_that!(store.count().await.unwrap(), eq(1));
    assert_that!(store.ping().await, ok(anything()));
}

#[tokio::test]
async fn given_malformed_row_when_scanning_then_row_is_skipped_and_removed() {
    // Given
    let pool = create_test_pool().await;
    let store = SqliteConnectionStore::new(pool.clone(), "connections")
        .await
        .unwrap();
    let good = ConnectionId::generate();
    store.insert(&good).await.unwrap();
    sqlx::query(r#"INSERT INTO "connections" (connection_id) VALUES ('')"#)
        .execute(&pool)
        .await
        .unwrap();

    // When
    let page = store.scan_page(None, 10).await.unwrap();

    // Then
    assert_eq!(page.ids, vec![good]);
    assert_that!(store.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_shared_pool_when_two_stores_use_different_tables_then_rows_are_isolated() {
    // Given
    let temp = tempfile::tempdir().unwrap();
    let config = RegistryConfig::default();
    let pool = create_registry_pool(&temp.path().join("shared.db"), &config)
        .await
        .unwrap();
    let blue = SqliteConnectionStore::new(pool.clone(), "blue").await.unwrap();
    let green = SqliteConnectionStore::new(pool, "green").await.unwrap();

    // When
    blue.insert(&ConnectionId::generate()).await.unwrap();

    // Then
    assert_that!(blue.count().await.unwrap(), eq(1));
    assert_that!(green.count().await.unwrap(), eq(0));
}
