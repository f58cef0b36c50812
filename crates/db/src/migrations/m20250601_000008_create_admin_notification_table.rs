//! Create admin notification table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminNotification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminNotification::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminNotification::NotificationType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminNotification::Message)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminNotification::ImageId).string_len(32))
                    .col(ColumnDef::new(AdminNotification::UserId).string_len(32))
                    .col(
                        ColumnDef::new(AdminNotification::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminNotification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_notification_is_read")
                    .table(AdminNotification::Table)
                    .col(AdminNotification::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminNotification::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminNotification {
    Table,
    Id,
    NotificationType,
    Message,
    ImageId,
    UserId,
    IsRead,
    CreatedAt,
}
