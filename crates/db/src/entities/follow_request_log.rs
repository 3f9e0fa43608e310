//! Follow request log entity (append-only record of request decisions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::follow_request::RequestKind;

/// Lifecycle state of a request.
///
/// `Pending` is never written to the log; it describes rows of the
/// `follow_request` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted; the edge(s) were created.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Rejected; no edge was created.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow_request_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub from_id: String,

    pub to_id: String,

    pub kind: RequestKind,

    /// Either `Accepted` or `Rejected`
    pub status: RequestStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
