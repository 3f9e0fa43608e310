//! Relationship graph error taxonomy.
//!
//! Every variant carries the identities involved as typed fields so callers
//! can render their own messages; `Display` is meant for logs.

use followgraph_common::{AppError, UserId};
use thiserror::Error;

/// Result type for relationship graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Broad classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before touching the stores.
    Validation,
    /// A precondition on existing state does not hold.
    Conflict,
    /// The referenced request, edge or friendship does not exist.
    NotFound,
    /// Stored state violates an invariant, typically after an earlier partial write.
    Integrity,
    /// The storage layer failed.
    Storage,
}

/// Relationship graph error.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{user} cannot enter a relationship with themselves")]
    SelfRelationship { user: UserId },

    #[error("{follower} is already following {followee}")]
    AlreadyFollowing { follower: UserId, followee: UserId },

    #[error("{user1} and {user2} are already friends")]
    AlreadyFriends { user1: UserId, user2: UserId },

    #[error("a request between {from} and {to} already exists")]
    RequestAlreadyExists { from: UserId, to: UserId },

    #[error("request from {from} to {to} does not exist")]
    RequestNotFound { from: UserId, to: UserId },

    #[error("{follower} does not follow {followee}")]
    FollowerNotFound { follower: UserId, followee: UserId },

    #[error("friendship between {user1} and {user2} does not exist")]
    FriendNotFound { user1: UserId, user2: UserId },

    #[error("friendship between {user1} and {user2} is inconsistent: {edges} of 2 edges present")]
    FriendshipIntegrity {
        user1: UserId,
        user2: UserId,
        edges: u64,
    },

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl GraphError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SelfRelationship { .. } => ErrorKind::Validation,
            Self::AlreadyFollowing { .. }
            | Self::AlreadyFriends { .. }
            | Self::RequestAlreadyExists { .. } => ErrorKind::Conflict,
            Self::RequestNotFound { .. }
            | Self::FollowerNotFound { .. }
            | Self::FriendNotFound { .. } => ErrorKind::NotFound,
            Self::FriendshipIntegrity { .. } => ErrorKind::Integrity,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SelfRelationship { .. } => "SELF_RELATIONSHIP",
            Self::AlreadyFollowing { .. } => "ALREADY_FOLLOWING",
            Self::AlreadyFriends { .. } => "ALREADY_FRIENDS",
            Self::RequestAlreadyExists { .. } => "REQUEST_ALREADY_EXISTS",
            Self::RequestNotFound { .. } => "REQUEST_NOT_FOUND",
            Self::FollowerNotFound { .. } => "FOLLOWER_NOT_FOUND",
            Self::FriendNotFound { .. } => "FRIEND_NOT_FOUND",
            Self::FriendshipIntegrity { .. } => "FRIENDSHIP_INTEGRITY",
            Self::Storage(err) => err.error_code(),
        }
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::Validation(err.to_string()),
            ErrorKind::Conflict => Self::Conflict(err.to_string()),
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::Integrity => match err {
                // Callers only learn that there is no friendship.
                GraphError::FriendshipIntegrity { user1, user2, .. } => {
                    Self::NotFound(GraphError::FriendNotFound { user1, user2 }.to_string())
                }
                other => Self::Internal(other.to_string()),
            },
            ErrorKind::Storage => match err {
                GraphError::Storage(inner) => inner,
                other => Self::Internal(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (UserId, UserId) {
        (UserId::from("alice"), UserId::from("bob"))
    }

    #[test]
    fn test_kinds() {
        let (a, b) = pair();

        assert_eq!(
            GraphError::SelfRelationship { user: a.clone() }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            GraphError::RequestAlreadyExists {
                from: a.clone(),
                to: b.clone()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            GraphError::FollowerNotFound {
                follower: a.clone(),
                followee: b.clone()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GraphError::FriendshipIntegrity {
                user1: a,
                user2: b,
                edges: 1
            }
            .kind(),
            ErrorKind::Integrity
        );
    }

    #[test]
    fn test_integrity_is_reported_as_not_found() {
        let (a, b) = pair();
        let err = GraphError::FriendshipIntegrity {
            user1: a,
            user2: b,
            edges: 1,
        };
        assert_eq!(err.error_code(), "FRIENDSHIP_INTEGRITY");

        match AppError::from(err) {
            AppError::NotFound(msg) => {
                assert!(msg.contains("alice"));
                assert!(msg.contains("does not exist"));
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_storage_error_passes_through() {
        let err = GraphError::from(AppError::Database("connection reset".to_string()));
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(matches!(AppError::from(err), AppError::Database(_)));
    }

    #[test]
    fn test_display_names_identities() {
        let (a, b) = pair();
        let err = GraphError::AlreadyFollowing {
            follower: a,
            followee: b,
        };
        assert_eq!(err.to_string(), "alice is already following bob");
    }
}
