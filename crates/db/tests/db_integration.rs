//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `shutter_test`)
//!   `TEST_DB_PASSWORD` (default: `shutter_test`)
//!   `TEST_DB_NAME` (default: `shutter_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use sea_orm::{ActiveValue::Set, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use shutter_db::{
    entities::{image, profile, rating, streak, user},
    migrations::Migrator,
    repositories::{
        ImageRepository, ProfileRepository, RatingRepository, StreakRepository, UserRepository,
    },
    test_utils::{TestDatabase, TestDbConfig},
};

async fn setup() -> (TestDatabase, Arc<DatabaseConnection>) {
    let db = TestDatabase::create_unique()
        .await
        .expect("Failed to create test database");
    Migrator::up(db.connection(), None)
        .await
        .expect("Migrations failed");
    // `DatabaseConnection` is not `Clone` when sea-orm's `mock` feature is
    // enabled (needed by the lib's unit tests), so open a second connection
    // to the same test database instead.
    let conn = Arc::new(
        Database::connect(&db.config.database_url())
            .await
            .expect("Failed to connect to test database"),
    );
    (db, conn)
}

async fn seed_user(conn: &Arc<DatabaseConnection>, id: &str) {
    UserRepository::new(Arc::clone(conn))
        .create(user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(format!("{id}@example.com")),
            username: Set(id.to_string()),
            username_lower: Set(id.to_lowercase()),
            password_hash: Set("hash".to_string()),
            token: Set(None),
            is_admin: Set(false),
            ..Default::default()
        })
        .await
        .expect("Failed to seed user");
}

async fn seed_image(conn: &Arc<DatabaseConnection>, id: &str, user_id: &str) {
    ImageRepository::new(Arc::clone(conn))
        .create(image::ActiveModel {
            id: Set(id.to_string()),
            user_id: Set(user_id.to_string()),
            image_url: Set(format!("/files/{id}.jpg")),
            ..Default::default()
        })
        .await
        .expect("Failed to seed image");
}

async fn seed_profile(conn: &Arc<DatabaseConnection>, user_id: &str) {
    ProfileRepository::new(Arc::clone(conn))
        .create(profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            is_public: Set(true),
            ..Default::default()
        })
        .await
        .expect("Failed to seed profile");
}

fn rating_model(id: &str, user_id: &str, image_id: &str, score: i32) -> rating::ActiveModel {
    rating::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        image_id: Set(image_id.to_string()),
        score: Set(score),
        updated_at: Set(Some(chrono::Utc::now().into())),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_rating_upsert_keeps_one_row() {
    let (db, conn) = setup().await;

    seed_user(&conn, "owner").await;
    seed_user(&conn, "rater").await;
    seed_image(&conn, "img", "owner").await;

    let ratings = RatingRepository::new(Arc::clone(&conn));
    ratings
        .upsert(rating_model("r1", "rater", "img", 6))
        .await
        .unwrap();
    ratings
        .upsert(rating_model("r2", "rater", "img", 9))
        .await
        .unwrap();

    // The unique (user, image) pair absorbs the second insert into an update
    let found = ratings
        .find_by_user_and_image("rater", "img")
        .await
        .unwrap()
        .expect("rating row missing");
    assert_eq!(found.id, "r1");
    assert_eq!(found.score, 9);

    let all = ratings.find_by_user("rater").await.unwrap();
    assert_eq!(all.len(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_aggregate_recompute_from_ratings() {
    let (db, conn) = setup().await;

    seed_user(&conn, "owner").await;
    seed_profile(&conn, "owner").await;
    seed_user(&conn, "rater1").await;
    seed_user(&conn, "rater2").await;
    seed_image(&conn, "img", "owner").await;

    let ratings = RatingRepository::new(Arc::clone(&conn));
    ratings
        .upsert(rating_model("r1", "rater1", "img", 8))
        .await
        .unwrap();
    ratings
        .upsert(rating_model("r2", "rater2", "img", 5))
        .await
        .unwrap();

    let images = ImageRepository::new(Arc::clone(&conn));
    let profiles = ProfileRepository::new(Arc::clone(&conn));
    images.recompute_aggregates("img").await.unwrap();
    profiles.recompute_rating_aggregates("owner").await.unwrap();

    let img = images.get_by_id("img").await.unwrap();
    assert_eq!(img.total_ratings, 2);
    assert!((img.average_rating - 6.5).abs() < 1e-9);

    let profile = profiles
        .find_by_user_id("owner")
        .await
        .unwrap()
        .expect("profile row missing");
    assert_eq!(profile.total_ratings_received, 2);
    assert!((profile.average_rating - 6.5).abs() < 1e-9);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_reset_except_zeroes_absent_images() {
    let (db, conn) = setup().await;

    seed_user(&conn, "owner").await;
    seed_image(&conn, "img1", "owner").await;
    seed_image(&conn, "img2", "owner").await;

    let streaks = StreakRepository::new(Arc::clone(&conn));
    streaks
        .create(streak::ActiveModel {
            id: Set("s1".to_string()),
            image_id: Set("img1".to_string()),
            streak_type: Set("country".to_string()),
            location_value: Set("Japan".to_string()),
            current_streak: Set(3),
            longest_streak: Set(3),
            last_in_top_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        })
        .await
        .unwrap();
    streaks
        .create(streak::ActiveModel {
            id: Set("s2".to_string()),
            image_id: Set("img2".to_string()),
            streak_type: Set("country".to_string()),
            location_value: Set("Japan".to_string()),
            current_streak: Set(2),
            longest_streak: Set(5),
            last_in_top_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        })
        .await
        .unwrap();

    streaks
        .reset_except("country", &["img1".to_string()])
        .await
        .unwrap();

    let kept = streaks
        .find_by_image_and_type("img1", "country")
        .await
        .unwrap()
        .expect("kept streak missing");
    assert_eq!(kept.current_streak, 3);

    let reset = streaks
        .find_by_image_and_type("img2", "country")
        .await
        .unwrap()
        .expect("reset streak missing");
    assert_eq!(reset.current_streak, 0);
    assert_eq!(reset.longest_streak, 5);

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
