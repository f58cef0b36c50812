//! Create image table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Image::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Image::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Image::ImageUrl).string_len(512).not_null())
                    .col(ColumnDef::new(Image::Title).string_len(100))
                    .col(ColumnDef::new(Image::Caption).string_len(150))
                    .col(ColumnDef::new(Image::Description).text())
                    .col(
                        ColumnDef::new(Image::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Image::TotalRatings)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Image::IsFlagged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Image::FlagReason).string_len(512))
                    .col(ColumnDef::new(Image::AiDetected).boolean())
                    .col(ColumnDef::new(Image::AiConfidence).integer())
                    .col(ColumnDef::new(Image::AiDetectionReason).string_len(1024))
                    .col(
                        ColumnDef::new(Image::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Image::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_user")
                            .from(Image::Table, Image::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's images)
        manager
            .create_index(
                Index::create()
                    .name("idx_image_user_id")
                    .table(Image::Table)
                    .col(Image::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: ranking order (average_rating, total_ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_image_ranking")
                    .table(Image::Table)
                    .col(Image::AverageRating)
                    .col(Image::TotalRatings)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Image::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
    UserId,
    ImageUrl,
    Title,
    Caption,
    Description,
    AverageRating,
    TotalRatings,
    IsFlagged,
    FlagReason,
    AiDetected,
    AiConfidence,
    AiDetectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
