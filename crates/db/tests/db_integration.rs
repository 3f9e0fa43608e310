//! Database integration tests.
//!
//! The `PostgreSQL` tests require a running instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `followgraph_test`)
//!   `TEST_DB_PASSWORD` (default: `followgraph_test`)
//!   `TEST_DB_NAME` (default: `followgraph_test`)

#![allow(clippy::unwrap_used)]

use followgraph_common::{AppError, UserId};
use followgraph_db::entities::RequestKind;
use followgraph_db::repositories::{FollowRequestRepository, FollowingRepository};
use followgraph_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::TransactionTrait;

#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_rows() {
    let db = TestDatabase::in_memory().await.unwrap();
    let edges = FollowingRepository::new();
    let requests = FollowRequestRepository::new();
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let txn = db.connection().begin().await.unwrap();
    requests
        .insert_pending(&txn, &alice, &bob, RequestKind::Friend)
        .await
        .unwrap();
    edges.add_edge(&txn, &alice, &bob).await.unwrap();
    txn.rollback().await.unwrap();

    assert!(
        requests
            .find_pending_between(db.connection(), &alice, &bob)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!edges.has_edge(db.connection(), &alice, &bob).await.unwrap());
}

#[tokio::test]
async fn test_committed_transaction_is_visible() {
    let db = TestDatabase::in_memory().await.unwrap();
    let edges = FollowingRepository::new();
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    let txn = db.connection().begin().await.unwrap();
    edges.add_edge(&txn, &alice, &bob).await.unwrap();
    edges.add_edge(&txn, &bob, &alice).await.unwrap();
    txn.commit().await.unwrap();

    let count = edges
        .count_edges_between(db.connection(), &alice, &bob, true)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_postgres_pending_pair_uniqueness() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    let requests = FollowRequestRepository::new();
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    requests
        .insert_pending(db.connection(), &alice, &bob, RequestKind::Follow)
        .await
        .unwrap();
    let reverse = requests
        .insert_pending(db.connection(), &bob, &alice, RequestKind::Friend)
        .await;
    assert!(matches!(reverse, Err(AppError::Conflict(_))));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_postgres_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
