//! Following service.
//!
//! Owns the request workflow (send, accept, reject, withdraw), the derived
//! relationship queries and the unlink operations. Each mutating operation
//! runs its precondition checks and writes in one database transaction;
//! unique indexes on the stores turn lost races into conflicts.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{GraphError, GraphResult};
use crate::services::event_publisher::{EventPublisherService, RelationshipEvent};
use crate::services::request::Request;
use followgraph_common::{AppError, UserId};
use followgraph_db::{
    entities::{RequestKind, RequestStatus},
    repositories::{FollowRequestRepository, FollowingRepository},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    db: Arc<DatabaseConnection>,
    following_repo: FollowingRepository,
    follow_request_repo: FollowRequestRepository,
    event_publisher: Option<EventPublisherService>,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            following_repo: FollowingRepository::new(),
            follow_request_repo: FollowRequestRepository::new(),
            db,
            event_publisher: None,
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    // ==================== Request Workflow ====================

    /// Propose a follow or friend relationship from `from` to `to`.
    pub async fn send_request(
        &self,
        from: &UserId,
        to: &UserId,
        kind: RequestKind,
    ) -> GraphResult<Request> {
        if from == to {
            tracing::debug!(user = %from, "Rejected self-referential request");
            return Err(GraphError::SelfRelationship { user: from.clone() });
        }

        let txn = self.begin().await?;
        let result = self.send_request_in(&txn, from, to, kind).await;
        let request = self.finish(txn, result).await?;

        tracing::info!(from = %from, to = %to, kind = ?kind, "Request sent");
        self.publish(RelationshipEvent::RequestSent {
            from: from.clone(),
            to: to.clone(),
            kind,
        })
        .await;

        Ok(request)
    }

    async fn send_request_in(
        &self,
        txn: &DatabaseTransaction,
        from: &UserId,
        to: &UserId,
        kind: RequestKind,
    ) -> GraphResult<Request> {
        match kind {
            RequestKind::Friend => {
                if self
                    .following_repo
                    .count_edges_between(txn, from, to, true)
                    .await?
                    == 2
                {
                    return Err(GraphError::AlreadyFriends {
                        user1: from.clone(),
                        user2: to.clone(),
                    });
                }
            }
            RequestKind::Follow => {
                if self.following_repo.has_edge(txn, from, to).await? {
                    return Err(GraphError::AlreadyFollowing {
                        follower: from.clone(),
                        followee: to.clone(),
                    });
                }
            }
        }

        let already_pending = || GraphError::RequestAlreadyExists {
            from: from.clone(),
            to: to.clone(),
        };

        if self
            .follow_request_repo
            .find_pending_between(txn, from, to)
            .await?
            .is_some()
        {
            return Err(already_pending());
        }

        // A concurrent sender may have passed the check above; the pair index decides.
        match self
            .follow_request_repo
            .insert_pending(txn, from, to, kind)
            .await
        {
            Ok(model) => Ok(Request::from(model)),
            Err(AppError::Conflict(_)) => Err(already_pending()),
            Err(e) => Err(e.into()),
        }
    }

    /// Accept the pending request sent by `from` to `to`.
    ///
    /// Consuming the request, logging the decision and creating the edge(s)
    /// commit together or not at all.
    pub async fn accept_request(&self, from: &UserId, to: &UserId) -> GraphResult<Request> {
        let txn = self.begin().await?;
        let result = self.accept_request_in(&txn, from, to).await;
        let accepted = self.finish(txn, result).await?;

        tracing::info!(from = %from, to = %to, kind = ?accepted.kind, "Request accepted");
        self.publish(RelationshipEvent::RequestAccepted {
            from: from.clone(),
            to: to.clone(),
            kind: accepted.kind,
        })
        .await;

        Ok(accepted)
    }

    async fn accept_request_in(
        &self,
        txn: &DatabaseTransaction,
        from: &UserId,
        to: &UserId,
    ) -> GraphResult<Request> {
        let pending = self.take_pending(txn, from, to).await?;

        let logged = self
            .follow_request_repo
            .append_log(txn, from, to, pending.kind, RequestStatus::Accepted)
            .await?;

        self.following_repo.add_edge(txn, from, to).await?;
        if pending.kind == RequestKind::Friend {
            self.following_repo.add_edge(txn, to, from).await?;
        }

        Ok(Request::from(logged))
    }

    /// Reject the pending request sent by `from` to `to`.
    pub async fn reject_request(&self, from: &UserId, to: &UserId) -> GraphResult<Request> {
        let txn = self.begin().await?;
        let result = self.reject_request_in(&txn, from, to).await;
        let rejected = self.finish(txn, result).await?;

        tracing::info!(from = %from, to = %to, kind = ?rejected.kind, "Request rejected");
        self.publish(RelationshipEvent::RequestRejected {
            from: from.clone(),
            to: to.clone(),
            kind: rejected.kind,
        })
        .await;

        Ok(rejected)
    }

    async fn reject_request_in(
        &self,
        txn: &DatabaseTransaction,
        from: &UserId,
        to: &UserId,
    ) -> GraphResult<Request> {
        let pending = self.take_pending(txn, from, to).await?;

        let logged = self
            .follow_request_repo
            .append_log(txn, from, to, pending.kind, RequestStatus::Rejected)
            .await?;

        Ok(Request::from(logged))
    }

    /// Withdraw the pending request sent by `from` to `to` without recording a decision.
    pub async fn remove_request(&self, from: &UserId, to: &UserId) -> GraphResult<()> {
        let txn = self.begin().await?;
        let result = self.take_pending(&txn, from, to).await;
        let withdrawn = self.finish(txn, result).await?;

        tracing::info!(from = %from, to = %to, "Request withdrawn");
        self.publish(RelationshipEvent::RequestWithdrawn {
            from: from.clone(),
            to: to.clone(),
            kind: withdrawn.kind,
        })
        .await;

        Ok(())
    }

    /// Pending requests sent or received by a user.
    pub async fn get_requests(&self, user: &UserId) -> GraphResult<Vec<Request>> {
        let requests = self
            .follow_request_repo
            .find_pending_for_user(self.db.as_ref(), user)
            .await?;
        Ok(requests.into_iter().map(Request::from).collect())
    }

    /// Pending requests sent by a user.
    pub async fn get_sent_requests(&self, user: &UserId) -> GraphResult<Vec<Request>> {
        let requests = self
            .follow_request_repo
            .find_sent(self.db.as_ref(), user)
            .await?;
        Ok(requests.into_iter().map(Request::from).collect())
    }

    /// Pending requests received by a user.
    pub async fn get_received_requests(&self, user: &UserId) -> GraphResult<Vec<Request>> {
        let requests = self
            .follow_request_repo
            .find_received(self.db.as_ref(), user)
            .await?;
        Ok(requests.into_iter().map(Request::from).collect())
    }

    /// Accepted and rejected requests involving a user, newest first.
    pub async fn get_request_history(&self, user: &UserId) -> GraphResult<Vec<Request>> {
        let entries = self
            .follow_request_repo
            .find_log_for_user(self.db.as_ref(), user)
            .await?;
        Ok(entries.into_iter().map(Request::from).collect())
    }

    /// Accepted and rejected requests sent by `from` to `to`, oldest first.
    pub async fn get_pair_history(&self, from: &UserId, to: &UserId) -> GraphResult<Vec<Request>> {
        let entries = self
            .follow_request_repo
            .find_log_for_pair(self.db.as_ref(), from, to)
            .await?;
        Ok(entries.into_iter().map(Request::from).collect())
    }

    // ==================== Relationship Queries ====================

    /// Users following `user`.
    pub async fn get_followers(&self, user: &UserId) -> GraphResult<BTreeSet<UserId>> {
        Ok(self
            .following_repo
            .followers_of(self.db.as_ref(), user)
            .await?)
    }

    /// Users `user` is following.
    pub async fn get_following(&self, user: &UserId) -> GraphResult<BTreeSet<UserId>> {
        Ok(self
            .following_repo
            .following_of(self.db.as_ref(), user)
            .await?)
    }

    /// Friends of `user`: the users who both follow and are followed by `user`.
    pub async fn get_friends(&self, user: &UserId) -> GraphResult<BTreeSet<UserId>> {
        let txn = self.begin().await?;
        let result = self.get_friends_in(&txn, user).await;
        self.finish(txn, result).await
    }

    async fn get_friends_in(
        &self,
        txn: &DatabaseTransaction,
        user: &UserId,
    ) -> GraphResult<BTreeSet<UserId>> {
        let followers = self.following_repo.followers_of(txn, user).await?;
        let following = self.following_repo.following_of(txn, user).await?;

        Ok(followers.intersection(&following).cloned().collect())
    }

    /// Succeed iff `user1` and `user2` follow each other.
    pub async fn are_friends(&self, user1: &UserId, user2: &UserId) -> GraphResult<()> {
        let edges = self
            .following_repo
            .count_edges_between(self.db.as_ref(), user1, user2, true)
            .await?;

        if edges == 2 {
            Ok(())
        } else {
            Err(GraphError::FriendNotFound {
                user1: user1.clone(),
                user2: user2.clone(),
            })
        }
    }

    /// Check if a user is following another.
    pub async fn is_following(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        Ok(self
            .following_repo
            .has_edge(self.db.as_ref(), follower, followee)
            .await?)
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user: &UserId) -> GraphResult<u64> {
        Ok(self
            .following_repo
            .count_followers(self.db.as_ref(), user)
            .await?)
    }

    /// Count users a user is following.
    pub async fn count_following(&self, user: &UserId) -> GraphResult<u64> {
        Ok(self
            .following_repo
            .count_following(self.db.as_ref(), user)
            .await?)
    }

    // ==================== Unlink Operations ====================

    /// Delete the edge `follower -> followee`.
    pub async fn remove_follower(&self, follower: &UserId, followee: &UserId) -> GraphResult<()> {
        let removed = self
            .following_repo
            .remove_edge(self.db.as_ref(), follower, followee)
            .await?;

        if !removed {
            tracing::debug!(follower = %follower, followee = %followee, "No edge to remove");
            return Err(GraphError::FollowerNotFound {
                follower: follower.clone(),
                followee: followee.clone(),
            });
        }

        tracing::info!(follower = %follower, followee = %followee, "Unfollowed");
        self.publish(RelationshipEvent::Unfollowed {
            follower: follower.clone(),
            followee: followee.clone(),
        })
        .await;

        Ok(())
    }

    /// Break the friendship between two users, deleting both edges.
    pub async fn remove_friend(&self, user1: &UserId, user2: &UserId) -> GraphResult<()> {
        let txn = self.begin().await?;
        let result = self.remove_friend_in(&txn, user1, user2).await;
        self.finish(txn, result).await?;

        tracing::info!(user1 = %user1, user2 = %user2, "Unfriended");
        self.publish(RelationshipEvent::Unfriended {
            user1: user1.clone(),
            user2: user2.clone(),
        })
        .await;

        Ok(())
    }

    async fn remove_friend_in(
        &self,
        txn: &DatabaseTransaction,
        user1: &UserId,
        user2: &UserId,
    ) -> GraphResult<()> {
        let edges = self
            .following_repo
            .count_edges_between(txn, user1, user2, true)
            .await?;
        if edges != 2 {
            return unfriend_outcome(user1, user2, edges);
        }

        let removed = self
            .following_repo
            .remove_edges_between(txn, user1, user2)
            .await?;
        if removed == 0 {
            tracing::debug!(user1 = %user1, user2 = %user2, "Friendship already removed");
        }
        unfriend_outcome(user1, user2, removed)
    }

    // ==================== Helpers ====================

    async fn take_pending(
        &self,
        txn: &DatabaseTransaction,
        from: &UserId,
        to: &UserId,
    ) -> GraphResult<Request> {
        self.follow_request_repo
            .take_pending(txn, from, to)
            .await?
            .map(Request::from)
            .ok_or_else(|| GraphError::RequestNotFound {
                from: from.clone(),
                to: to.clone(),
            })
    }

    async fn begin(&self) -> GraphResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()).into())
    }

    /// Commit on success, roll back on failure.
    async fn finish<T>(&self, txn: DatabaseTransaction, result: GraphResult<T>) -> GraphResult<T> {
        match result {
            Ok(value) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, code = err.error_code(), "Rolling back");
                if let Err(e) = txn.rollback().await {
                    tracing::warn!(error = %e, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }

    async fn publish(&self, event: RelationshipEvent) {
        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher.publish(&event).await {
                tracing::warn!(error = %e, ?event, "Failed to publish relationship event");
            }
        }
    }
}

/// Map the number of edges found (or deleted) between two users to the
/// result of breaking their friendship.
///
/// No edges means there is no friendship, possibly because a concurrent
/// call removed it first. Exactly one edge is a half-written friendship.
fn unfriend_outcome(user1: &UserId, user2: &UserId, edges: u64) -> GraphResult<()> {
    match edges {
        2 => Ok(()),
        0 => Err(GraphError::FriendNotFound {
            user1: user1.clone(),
            user2: user2.clone(),
        }),
        _ => {
            tracing::error!(
                user1 = %user1,
                user2 = %user2,
                edges,
                "Friendship is missing an edge; an earlier write was only partially applied"
            );
            Err(GraphError::FriendshipIntegrity {
                user1: user1.clone(),
                user2: user2.clone(),
                edges,
            })
        }
    }
}
