//! Create `subscriptions` table.
//! One row per user subscription to a paid service; `end_date` NULL means open-ended.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(uuid(Subscriptions::Id).primary_key())
                    .col(uuid(Subscriptions::UserId))
                    .col(string_len(Subscriptions::ServiceName, 100))
                    .col(integer(Subscriptions::Price).check(Expr::col(Subscriptions::Price).gt(0)))
                    .col(timestamp_with_time_zone(Subscriptions::StartDate))
                    .col(timestamp_with_time_zone_null(Subscriptions::EndDate))
                    .to_owned(),
            )
            .await?;

        // Summary queries filter by user most of the time
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subscriptions_user_id").table(Subscriptions::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Subscriptions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    ServiceName,
    Price,
    StartDate,
    EndDate,
}
