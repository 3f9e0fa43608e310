//! Following repository (the edge store).

use std::collections::BTreeSet;

use crate::entities::{Following, following};
use crate::repositories::db_error;
use chrono::Utc;
use followgraph_common::{AppResult, IdGenerator, UserId};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, sea_query::OnConflict,
};

/// Following repository for database operations.
///
/// Holds no connection: every operation runs on the connection it is given,
/// either the pool or an open transaction.
#[derive(Debug, Clone, Default)]
pub struct FollowingRepository {
    id_gen: IdGenerator,
}

impl FollowingRepository {
    /// Create a new following repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Find the edge `follower -> followee`.
    pub async fn find_edge<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: &UserId,
        followee_id: &UserId,
    ) -> AppResult<Option<following::Model>> {
        Following::find()
            .filter(following::Column::FollowerId.eq(follower_id.as_str()))
            .filter(following::Column::FolloweeId.eq(followee_id.as_str()))
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Check if the edge `follower -> followee` exists.
    pub async fn has_edge<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: &UserId,
        followee_id: &UserId,
    ) -> AppResult<bool> {
        Ok(self.find_edge(conn, follower_id, followee_id).await?.is_some())
    }

    /// Insert the edge `follower -> followee`.
    ///
    /// An existing edge for the same pair is left untouched. Returns whether
    /// a new row was written.
    pub async fn add_edge<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: &UserId,
        followee_id: &UserId,
    ) -> AppResult<bool> {
        let model = following::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = Following::insert(model)
            .on_conflict(
                OnConflict::columns([
                    following::Column::FollowerId,
                    following::Column::FolloweeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_error)?;

        Ok(inserted > 0)
    }

    /// Delete the edge `follower -> followee`. Returns whether it existed.
    pub async fn remove_edge<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: &UserId,
        followee_id: &UserId,
    ) -> AppResult<bool> {
        let result = Following::delete_many()
            .filter(following::Column::FollowerId.eq(follower_id.as_str()))
            .filter(following::Column::FolloweeId.eq(followee_id.as_str()))
            .exec(conn)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }

    /// Users with an edge towards `user_id`.
    pub async fn followers_of<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<BTreeSet<UserId>> {
        let ids: Vec<String> = Following::find()
            .select_only()
            .column(following::Column::FollowerId)
            .filter(following::Column::FolloweeId.eq(user_id.as_str()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_error)?;

        Ok(ids.into_iter().map(UserId::from).collect())
    }

    /// Users `user_id` has an edge towards.
    pub async fn following_of<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<BTreeSet<UserId>> {
        let ids: Vec<String> = Following::find()
            .select_only()
            .column(following::Column::FolloweeId)
            .filter(following::Column::FollowerId.eq(user_id.as_str()))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_error)?;

        Ok(ids.into_iter().map(UserId::from).collect())
    }

    /// Count edges from `user1` to `user2`, plus the reverse edge when
    /// `both_directions` is set.
    pub async fn count_edges_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        user1: &UserId,
        user2: &UserId,
        both_directions: bool,
    ) -> AppResult<u64> {
        Following::find()
            .filter(between(user1, user2, both_directions))
            .count(conn)
            .await
            .map_err(db_error)
    }

    /// Delete the edges between two users in both directions.
    /// Returns the number of rows removed.
    pub async fn remove_edges_between<C: ConnectionTrait>(
        &self,
        conn: &C,
        user1: &UserId,
        user2: &UserId,
    ) -> AppResult<u64> {
        let result = Following::delete_many()
            .filter(between(user1, user2, true))
            .exec(conn)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected)
    }

    /// Count followers of a user.
    pub async fn count_followers<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<u64> {
        Following::find()
            .filter(following::Column::FolloweeId.eq(user_id.as_str()))
            .count(conn)
            .await
            .map_err(db_error)
    }

    /// Count users a user is following.
    pub async fn count_following<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &UserId,
    ) -> AppResult<u64> {
        Following::find()
            .filter(following::Column::FollowerId.eq(user_id.as_str()))
            .count(conn)
            .await
            .map_err(db_error)
    }
}

fn edge(follower_id: &UserId, followee_id: &UserId) -> Condition {
    Condition::all()
        .add(following::Column::FollowerId.eq(follower_id.as_str()))
        .add(following::Column::FolloweeId.eq(followee_id.as_str()))
}

fn between(user1: &UserId, user2: &UserId, both_directions: bool) -> Condition {
    let condition = Condition::any().add(edge(user1, user2));
    if both_directions {
        condition.add(edge(user2, user1))
    } else {
        condition
    }
}
