//! Request view shared by the pending set and the decision log.

use chrono::{DateTime, FixedOffset};
use followgraph_common::UserId;
use followgraph_db::entities::{RequestKind, RequestStatus, follow_request, follow_request_log};
use serde::Serialize;

/// A follow or friend request, pending or decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Row id of the pending request or of the log entry.
    pub id: String,
    /// Sender.
    pub from: UserId,
    /// Recipient.
    pub to: UserId,
    /// What accepting creates.
    pub kind: RequestKind,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// When the request was sent, or when the decision was recorded.
    pub created_at: DateTime<FixedOffset>,
}

impl Request {
    /// Whether `user` sent or received this request.
    #[must_use]
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from == user || &self.to == user
    }
}

impl From<follow_request::Model> for Request {
    fn from(model: follow_request::Model) -> Self {
        Self {
            id: model.id,
            from: UserId::from(model.from_id),
            to: UserId::from(model.to_id),
            kind: model.kind,
            status: RequestStatus::Pending,
            created_at: model.created_at,
        }
    }
}

impl From<follow_request_log::Model> for Request {
    fn from(model: follow_request_log::Model) -> Self {
        Self {
            id: model.id,
            from: UserId::from(model.from_id),
            to: UserId::from(model.to_id),
            kind: model.kind,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
