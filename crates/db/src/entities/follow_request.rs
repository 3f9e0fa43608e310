//! Follow request entity (pending follow and friend proposals).
//!
//! Only pending requests live here. Accepting, rejecting or withdrawing a
//! request deletes its row; decisions are appended to
//! [`follow_request_log`](super::follow_request_log).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What accepting the request creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// A single edge `from -> to`.
    #[sea_orm(string_value = "follow")]
    Follow,
    /// Edges in both directions.
    #[sea_orm(string_value = "friend")]
    Friend,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who sent the request
    pub from_id: String,

    /// The user who received the request
    pub to_id: String,

    /// Lesser of the two user ids (unordered pair key)
    pub pair_low: String,

    /// Greater of the two user ids (unordered pair key)
    pub pair_high: String,

    pub kind: RequestKind,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
