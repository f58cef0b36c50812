//! Create profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::Name).string_len(256))
                    .col(ColumnDef::new(Profile::Age).integer())
                    .col(ColumnDef::new(Profile::AvatarUrl).string_len(512))
                    .col(ColumnDef::new(Profile::Continent).string_len(64))
                    .col(ColumnDef::new(Profile::Country).string_len(128))
                    .col(ColumnDef::new(Profile::CountryCode).string_len(8))
                    .col(ColumnDef::new(Profile::State).string_len(128))
                    .col(ColumnDef::new(Profile::District).string_len(128))
                    .col(ColumnDef::new(Profile::City).string_len(128))
                    .col(
                        ColumnDef::new(Profile::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Profile::BadgeRank).integer())
                    .col(
                        ColumnDef::new(Profile::TotalImages)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::FollowersCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::FollowingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Profile::TotalRatingsReceived)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Profile::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes on location fields (scope resolution filters on one field)
        for (name, col) in [
            ("idx_profile_continent", Profile::Continent),
            ("idx_profile_country", Profile::Country),
            ("idx_profile_state", Profile::State),
            ("idx_profile_district", Profile::District),
            ("idx_profile_city", Profile::City),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Profile::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        // Index: global standing ordering (badge assignment)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_standing")
                    .table(Profile::Table)
                    .col(Profile::AverageRating)
                    .col(Profile::TotalRatingsReceived)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
    Name,
    Age,
    AvatarUrl,
    Continent,
    Country,
    CountryCode,
    State,
    District,
    City,
    IsPublic,
    BadgeRank,
    TotalImages,
    FollowersCount,
    FollowingCount,
    AverageRating,
    TotalRatingsReceived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
