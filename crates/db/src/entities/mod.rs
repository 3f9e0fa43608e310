//! Database entities.

#![allow(missing_docs)]

pub mod follow_request;
pub mod follow_request_log;
pub mod following;

pub use follow_request::{Entity as FollowRequest, RequestKind};
pub use follow_request_log::{Entity as FollowRequestLog, RequestStatus};
pub use following::Entity as Following;
