//! Event publisher service.
//!
//! Provides an abstraction for publishing relationship changes after they
//! have been committed. Delivery (pub/sub, notifications, feeds) is up to the
//! implementation.

use async_trait::async_trait;
use followgraph_common::{AppResult, UserId};
use followgraph_db::entities::RequestKind;
use std::sync::Arc;

/// A committed change to the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipEvent {
    /// A request was created.
    RequestSent {
        from: UserId,
        to: UserId,
        kind: RequestKind,
    },
    /// A request was accepted and its edge(s) created.
    RequestAccepted {
        from: UserId,
        to: UserId,
        kind: RequestKind,
    },
    /// A request was rejected.
    RequestRejected {
        from: UserId,
        to: UserId,
        kind: RequestKind,
    },
    /// A pending request was withdrawn without a decision.
    RequestWithdrawn {
        from: UserId,
        to: UserId,
        kind: RequestKind,
    },
    /// A follow edge was removed.
    Unfollowed { follower: UserId, followee: UserId },
    /// Both edges of a friendship were removed.
    Unfriended { user1: UserId, user2: UserId },
}

/// Trait for publishing relationship events.
///
/// This allows the following service to announce changes
/// without depending on a delivery mechanism.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a committed relationship change.
    async fn publish(&self, event: &RelationshipEvent) -> AppResult<()>;
}

/// A no-op implementation of `EventPublisher` for testing or when events are disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: &RelationshipEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;
