//! Create streak table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Streak::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Streak::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Streak::ImageId).string_len(32).not_null())
                    .col(ColumnDef::new(Streak::StreakType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Streak::LocationValue)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Streak::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Streak::LongestStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Streak::LastInTopAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Streak::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Streak::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_streak_image")
                            .from(Streak::Table, Streak::ImageId)
                            .to(Image::Table, Image::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one streak row per (image, scope kind)
        manager
            .create_index(
                Index::create()
                    .name("idx_streak_image_type")
                    .table(Streak::Table)
                    .col(Streak::ImageId)
                    .col(Streak::StreakType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Streak::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Streak {
    Table,
    Id,
    ImageId,
    StreakType,
    LocationValue,
    CurrentStreak,
    LongestStreak,
    LastInTopAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}
