//! Create `follow_request_log` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowRequestLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowRequestLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FollowRequestLog::FromId).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequestLog::ToId).string_len(64).not_null())
                    .col(ColumnDef::new(FollowRequestLog::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(FollowRequestLog::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(FollowRequestLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Only decisions are logged
                    .check(Expr::col(FollowRequestLog::Status).is_in(["accepted", "rejected"]))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_log_from_to")
                    .table(FollowRequestLog::Table)
                    .col(FollowRequestLog::FromId)
                    .col(FollowRequestLog::ToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_log_to_id")
                    .table(FollowRequestLog::Table)
                    .col(FollowRequestLog::ToId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowRequestLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowRequestLog {
    Table,
    Id,
    FromId,
    ToId,
    Kind,
    Status,
    CreatedAt,
}
