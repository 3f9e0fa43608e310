//! Core business logic for followgraph.
//!
//! [`FollowingService`] drives the follow/friend request workflow on top of
//! the edge and request stores in `followgraph-db`, and answers the derived
//! relationship queries (followers, following, friends).

pub mod error;
pub mod services;

pub use error::{ErrorKind, GraphError, GraphResult};
pub use services::*;
