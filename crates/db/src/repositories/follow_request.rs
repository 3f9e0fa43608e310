//! Follow request repository (the request store).
//!
//! Pending requests are mutable rows; decisions go to an append-only log.


use crate::entities::{
    FollowRequest, FollowRequestLog, RequestKind, RequestStatus, follow_request,
    follow_request_log,
};
use crate::repositories::db_error;
use chrono::Utc;
use followgraph_common::{AppError, AppResult, IdGenerator, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

/// Follow request repository for database operations.
///
/// Holds no connection: every operation runs on the connection it is given,
/// either the pool or an open transaction.
#[derive(Debug, Clone, Default)]
pub struct FollowRequestRepository {
    id_gen: IdGenerator,
}

impl FollowRequestRepository {
    /// Create a new follow request repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Insert a pending request.
    ///
    /// Fails with `AppError::Conflict` when a pending request already exists
    /// for the unordered pair, whatever its direction or kind.
    pub async fn insert_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        from_id: &UserId,
        to_id: &UserId,
        kind: RequestKind,
    ) -> AppResult<follow_request::Model> {
        let (low, high) = UserId::ordered_pair(from_id, to_id);

        let model = follow_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            from_id: Set(from_id.to_string()),
            to_id: Set(to_id.to_string()),
            pair_low: Set(low.to_string()),
            pair_high: Set(high.to_string()),
            kind: Set(kind),
            created_at: Set(Utc::now().into()),
        };

        model.insert(conn).await.map_err(db_error)
    }

    /// Find the pending request sent by `from_id` to `to_id`.
    pub async fn find_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        from_id: &UserId,
        to_id: &UserId,
    ) -> AppResult<Option<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::FromId.eq(from_id.as_str()))
            .filter(follow_request::Column::ToId.eq(to_id.as_str()))
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Find the pending request between two users in either direction.
    pub async fn find_pending_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        user1: &UserId,
        user2: &UserId,
    ) -> AppResult<Option<follow_request::Model>> {
        let (low, high) = UserId::ordered_pair(user1, user2);

        FollowRequest::find()
            .filter(follow_request::Column::PairLow.eq(low.as_str()))
            .filter(follow_request::Column::PairHigh.eq(high.as_str()))
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Remove and return the pending request sent by `from_id` to `to_id`.
    ///
    /// Returns `None` when there is no such request, including when a
    /// concurrent caller consumed it between the read and the delete.
    pub async fn take_pending<C: ConnectionTrait>(
        &self,
        conn: &C,
        from_id: &UserId,
        to_id: &UserId,
    ) -> AppResult<Option<follow_request::Model>> {
        let Some(request) = self.find_pending(conn, from_id, to_id).await? else {
            return Ok(None);
        };

        let result = FollowRequest::delete_by_id(request.id.clone())
            .exec(conn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 1 {
            Ok(Some(request))
        } else {
            Ok(None)
        }
    }

    /// Pending requests sent or received by a user, oldest first.
    pub async fn find_pending_for_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<Vec<follow_request::Model>> {
        FollowRequest::find()
            .filter(
                Condition::any()
                    .add(follow_request::Column::FromId.eq(user_id.as_str()))
                    .add(follow_request::Column::ToId.eq(user_id.as_str())),
            )
            .order_by_asc(follow_request::Column::CreatedAt)
            .order_by_asc(follow_request::Column::Id)
            .all(conn)
            .await
            .map_err(db_error)
    }

    /// Pending requests sent by a user, oldest first.
    pub async fn find_sent<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<Vec<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::FromId.eq(user_id.as_str()))
            .order_by_asc(follow_request::Column::CreatedAt)
            .order_by_asc(follow_request::Column::Id)
            .all(conn)
            .await
            .map_err(db_error)
    }

    /// Pending requests received by a user, oldest first.
    pub async fn find_received<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<Vec<follow_request::Model>> {
        FollowRequest::find()
            .filter(follow_request::Column::ToId.eq(user_id.as_str()))
            .order_by_asc(follow_request::Column::CreatedAt)
            .order_by_asc(follow_request::Column::Id)
            .all(conn)
            .await
            .map_err(db_error)
    }

    /// Append a decision to the request log.
    ///
    /// Only terminal statuses are accepted; pending requests live in
    /// `follow_request`.
    pub async fn append_log<C: ConnectionTrait>(
        &self,
        conn: &C,
        from_id: &UserId,
        to_id: &UserId,
        kind: RequestKind,
        status: RequestStatus,
    ) -> AppResult<follow_request_log::Model> {
        if !status.is_terminal() {
            return Err(AppError::Validation(format!(
                "request log only records decisions, got {status:?}"
            )));
        }

        let model = follow_request_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            from_id: Set(from_id.to_string()),
            to_id: Set(to_id.to_string()),
            kind: Set(kind),
            status: Set(status),
            created_at: Set(Utc::now().into()),
        };

        model.insert(conn).await.map_err(db_error)
    }

    /// Logged decisions involving a user, newest first.
    pub async fn find_log_for_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<Vec<follow_request_log::Model>> {
        FollowRequestLog::find()
            .filter(
                Condition::any()
                    .add(follow_request_log::Column::FromId.eq(user_id.as_str()))
                    .add(follow_request_log::Column::ToId.eq(user_id.as_str())),
            )
            .order_by_desc(follow_request_log::Column::CreatedAt)
            .order_by_desc(follow_request_log::Column::Id)
            .all(conn)
            .await
            .map_err(db_error)
    }

    /// Logged decisions for requests sent by `from_id` to `to_id`, oldest first.
    pub async fn find_log_for_pair<C: ConnectionTrait>(
        &self,
        conn: &C,
        from_id: &UserId,
        to_id: &UserId,
    ) -> AppResult<Vec<follow_request_log::Model>> {
        FollowRequestLog::find()
            .filter(follow_request_log::Column::FromId.eq(from_id.as_str()))
            .filter(follow_request_log::Column::ToId.eq(to_id.as_str()))
            .order_by_asc(follow_request_log::Column::CreatedAt)
            .order_by_asc(follow_request_log::Column::Id)
            .all(conn)
            .await
            .map_err(db_error)
    }
}
