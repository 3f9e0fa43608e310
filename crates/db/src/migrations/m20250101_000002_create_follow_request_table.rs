//! Create `follow_request` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FollowRequest::FromId).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequest::ToId).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequest::PairLow).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequest::PairHigh).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequest::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(FollowRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(FollowRequest::FromId).ne(Expr::col(FollowRequest::ToId)))
                    .to_owned(),
            )
            .await?;

        // Unique index: (pair_low, pair_high) - one pending request per unordered pair,
        // whatever its direction or kind
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_pair")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::PairLow)
                    .col(FollowRequest::PairHigh)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: from_id (sent requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_from_id")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::FromId)
                    .to_owned(),
            )
            .await?;

        // Index: to_id (received requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_to_id")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::ToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowRequest {
    Table,
    Id,
    FromId,
    ToId,
    PairLow,
    PairHigh,
    Kind,
    CreatedAt,
}
