//! Repositories for database operations.
//!
//! Every operation takes the connection to run on, so the same call works
//! against the pool or inside an open transaction.

pub mod follow_request;
pub mod following;

pub use follow_request::FollowRequestRepository;
pub use following::FollowingRepository;

use followgraph_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a database error, keeping unique-constraint violations distinguishable.
pub(crate) fn db_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}
