//! End-to-end relationship workflow tests against an in-memory database.

#![allow(clippy::unwrap_used)]

use followgraph_common::{AppError, UserId};
use followgraph_core::{ErrorKind, FollowingService, GraphError};
use followgraph_db::entities::{RequestKind, RequestStatus};
use followgraph_db::test_utils::TestDatabase;
use maplit::btreeset;
use std::collections::BTreeSet;

struct Users {
    a: UserId,
    b: UserId,
}

async fn setup() -> (TestDatabase, FollowingService, Users) {
    let db = TestDatabase::in_memory().await.unwrap();
    let service = FollowingService::new(db.shared());
    let users = Users {
        a: UserId::from("user_a"),
        b: UserId::from("user_b"),
    };
    (db, service, users)
}

async fn befriend(service: &FollowingService, a: &UserId, b: &UserId) {
    service
        .send_request(a, b, RequestKind::Friend)
        .await
        .unwrap();
    service.accept_request(a, b).await.unwrap();
}

#[tokio::test]
async fn test_follow_request_accepted() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Follow)
        .await
        .unwrap();
    service.accept_request(&a, &b).await.unwrap();

    assert!(service.get_following(&a).await.unwrap().contains(&b));
    assert!(service.get_followers(&b).await.unwrap().contains(&a));
    assert!(service.get_requests(&a).await.unwrap().is_empty());
    assert!(service.get_requests(&b).await.unwrap().is_empty());
    assert_eq!(service.get_friends(&a).await.unwrap(), BTreeSet::new());

    let err = service.are_friends(&a, &b).await.unwrap_err();
    assert!(matches!(err, GraphError::FriendNotFound { .. }));
}

#[tokio::test]
async fn test_friend_request_accepted() {
    let (_db, service, Users { a, b }) = setup().await;

    befriend(&service, &a, &b).await;

    service.are_friends(&a, &b).await.unwrap();
    service.are_friends(&b, &a).await.unwrap();
    assert_eq!(service.get_friends(&a).await.unwrap(), btreeset! {b.clone()});
    assert_eq!(service.get_friends(&b).await.unwrap(), btreeset! {a.clone()});

    let history = service.get_pair_history(&a, &b).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, RequestStatus::Accepted);
    assert_eq!(history[0].kind, RequestKind::Friend);
}

#[tokio::test]
async fn test_reject_then_accept_is_not_found() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Follow)
        .await
        .unwrap();
    let rejected = service.reject_request(&a, &b).await.unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let err = service.accept_request(&a, &b).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(err, GraphError::RequestNotFound { .. }));
}

#[tokio::test]
async fn test_pending_request_blocks_every_new_send() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Follow)
        .await
        .unwrap();

    for (from, to, kind) in [
        (&a, &b, RequestKind::Follow),
        (&a, &b, RequestKind::Friend),
        (&b, &a, RequestKind::Follow),
        (&b, &a, RequestKind::Friend),
    ] {
        let err = service.send_request(from, to, kind).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict, "{from} -> {to} {kind:?}");
        assert!(matches!(err, GraphError::RequestAlreadyExists { .. }));
    }

    assert_eq!(service.get_requests(&a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_friend() {
    let (_db, service, Users { a, b }) = setup().await;

    befriend(&service, &a, &b).await;
    service.remove_friend(&a, &b).await.unwrap();

    assert!(!service.is_following(&a, &b).await.unwrap());
    assert!(!service.is_following(&b, &a).await.unwrap());
    assert!(service.are_friends(&a, &b).await.is_err());

    let err = service.remove_friend(&b, &a).await.unwrap_err();
    assert!(matches!(err, GraphError::FriendNotFound { .. }));
}

#[tokio::test]
async fn test_self_request_is_validation_error() {
    let (_db, service, Users { a, .. }) = setup().await;

    for kind in [RequestKind::Follow, RequestKind::Friend] {
        let err = service.send_request(&a, &a, kind).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}

#[tokio::test]
async fn test_friend_request_rejected_then_resent() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Friend)
        .await
        .unwrap();
    service.reject_request(&a, &b).await.unwrap();

    assert_eq!(service.count_following(&a).await.unwrap(), 0);
    assert_eq!(service.count_following(&b).await.unwrap(), 0);

    let history = service.get_request_history(&a).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, RequestStatus::Rejected);
    assert_eq!(history[0].kind, RequestKind::Friend);

    let resent = service
        .send_request(&a, &b, RequestKind::Friend)
        .await
        .unwrap();
    assert_eq!(resent.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_unfollow_leaves_reverse_edge() {
    let (_db, service, Users { a, b }) = setup().await;

    befriend(&service, &a, &b).await;

    // A unfollows B
    service.remove_follower(&a, &b).await.unwrap();

    assert!(!service.is_following(&a, &b).await.unwrap());
    assert!(service.is_following(&b, &a).await.unwrap());
    assert!(service.are_friends(&a, &b).await.is_err());
    assert!(service.get_following(&b).await.unwrap().contains(&a));
    assert!(service.get_friends(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_drop_follower_leaves_reverse_edge() {
    let (_db, service, Users { a, b }) = setup().await;

    befriend(&service, &a, &b).await;

    // A drops follower B
    service.remove_follower(&b, &a).await.unwrap();

    assert!(service.is_following(&a, &b).await.unwrap());
    assert!(!service.is_following(&b, &a).await.unwrap());
    assert_eq!(service.get_followers(&a).await.unwrap(), BTreeSet::new());

    // The remaining single edge is not a friendship
    let err = service.remove_friend(&a, &b).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert!(matches!(AppError::from(err), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_sends_for_same_pair() {
    let (_db, service, Users { a, b }) = setup().await;

    let (first, second) = tokio::join!(
        service.send_request(&a, &b, RequestKind::Follow),
        service.send_request(&b, &a, RequestKind::Friend),
    );

    let results = [first, second];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);

    let failed = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(failed.kind(), ErrorKind::Conflict);

    assert_eq!(service.get_requests(&a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_accepts_consume_once() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Friend)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        service.accept_request(&a, &b),
        service.accept_request(&a, &b),
    );

    assert!(first.is_ok() != second.is_ok());
    let err = first.err().or(second.err()).unwrap();
    assert!(matches!(err, GraphError::RequestNotFound { .. }));

    assert_eq!(service.get_pair_history(&a, &b).await.unwrap().len(), 1);
    service.are_friends(&a, &b).await.unwrap();
}

#[tokio::test]
async fn test_withdrawn_request_can_be_resent() {
    let (_db, service, Users { a, b }) = setup().await;

    service
        .send_request(&a, &b, RequestKind::Follow)
        .await
        .unwrap();
    service.remove_request(&a, &b).await.unwrap();

    assert!(service.get_received_requests(&b).await.unwrap().is_empty());
    assert!(service.get_request_history(&b).await.unwrap().is_empty());

    service
        .send_request(&b, &a, RequestKind::Follow)
        .await
        .unwrap();
    let received = service.get_received_requests(&a).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].from, b);
}
