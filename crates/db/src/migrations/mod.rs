//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_profile_table;
mod m20250601_000003_create_image_table;
mod m20250601_000004_create_rating_table;
mod m20250601_000005_create_follow_table;
mod m20250601_000006_create_streak_table;
mod m20250601_000007_create_report_table;
mod m20250601_000008_create_admin_notification_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_profile_table::Migration),
            Box::new(m20250601_000003_create_image_table::Migration),
            Box::new(m20250601_000004_create_rating_table::Migration),
            Box::new(m20250601_000005_create_follow_table::Migration),
            Box::new(m20250601_000006_create_streak_table::Migration),
            Box::new(m20250601_000007_create_report_table::Migration),
            Box::new(m20250601_000008_create_admin_notification_table::Migration),
        ]
    }
}
