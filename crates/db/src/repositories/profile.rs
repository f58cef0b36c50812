//! Profile repository.

use std::sync::Arc;

use crate::entities::{Profile, profile};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
    sea_query::Expr,
};
use shutter_common::{AppError, AppResult, Granularity};

/// Map a location granularity to its profile column.
const fn location_column(granularity: Granularity) -> profile::Column {
    match granularity {
        Granularity::Continent => profile::Column::Continent,
        Granularity::Country => profile::Column::Country,
        Granularity::State => profile::Column::State,
        Granularity::District => profile::Column::District,
        Granularity::City => profile::Column::City,
    }
}

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find profiles for a set of users.
    pub async fn find_by_user_ids(&self, user_ids: &[String]) -> AppResult<Vec<profile::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        Profile::find()
            .filter(profile::Column::UserId.is_in(user_ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the users whose profile matches a location value at the given
    /// granularity.
    pub async fn find_user_ids_by_location(
        &self,
        granularity: Granularity,
        value: &str,
    ) -> AppResult<Vec<String>> {
        let profiles = Profile::find()
            .filter(location_column(granularity).eq(value))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(profiles.into_iter().map(|p| p.user_id).collect())
    }

    /// Create a new profile.
    pub async fn create(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a profile.
    pub async fn update(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment followers count atomically.
    pub async fn increment_followers_count(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::FollowersCount,
                Expr::col(profile::Column::FollowersCount).add(1),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement followers count atomically.
    pub async fn decrement_followers_count(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::FollowersCount,
                Expr::cust("GREATEST(followers_count - 1, 0)"),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment following count atomically.
    pub async fn increment_following_count(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::FollowingCount,
                Expr::col(profile::Column::FollowingCount).add(1),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement following count atomically.
    pub async fn decrement_following_count(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::FollowingCount,
                Expr::cust("GREATEST(following_count - 1, 0)"),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Increment total images count atomically.
    pub async fn increment_total_images(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::TotalImages,
                Expr::col(profile::Column::TotalImages).add(1),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Decrement total images count atomically.
    pub async fn decrement_total_images(&self, user_id: &str) -> AppResult<()> {
        Profile::update_many()
            .col_expr(
                profile::Column::TotalImages,
                Expr::cust("GREATEST(total_images - 1, 0)"),
            )
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Recompute the profile's rating aggregates from the live rating rows.
    ///
    /// A single statement so the average and count always come from the same
    /// snapshot of the data.
    pub async fn recompute_rating_aggregates(&self, user_id: &str) -> AppResult<()> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "profile" SET
                "average_rating" = COALESCE((
                    SELECT AVG("rating"."score")::float8 FROM "rating"
                    JOIN "image" ON "rating"."image_id" = "image"."id"
                    WHERE "image"."user_id" = $1
                ), 0),
                "total_ratings_received" = (
                    SELECT COUNT(*) FROM "rating"
                    JOIN "image" ON "rating"."image_id" = "image"."id"
                    WHERE "image"."user_id" = $1
                ),
                "updated_at" = CURRENT_TIMESTAMP
            WHERE "user_id" = $1"#,
            [user_id.into()],
        );

        self.db
            .execute(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Top-rated profiles by global standing.
    pub async fn top_rated(&self, limit: u64) -> AppResult<Vec<profile::Model>> {
        Profile::find()
            .filter(profile::Column::TotalRatingsReceived.gt(0))
            .order_by_desc(profile::Column::AverageRating)
            .order_by_desc(profile::Column::TotalRatingsReceived)
            .order_by_asc(profile::Column::UserId)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Clear every badge rank.
    pub async fn clear_badge_ranks(&self) -> AppResult<()> {
        Profile::update_many()
            .col_expr(profile::Column::BadgeRank, Expr::value(Option::<i32>::None))
            .filter(profile::Column::BadgeRank.is_not_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Assign a badge rank to a user.
    pub async fn set_badge_rank(&self, user_id: &str, rank: i32) -> AppResult<()> {
        Profile::update_many()
            .col_expr(profile::Column::BadgeRank, Expr::value(rank))
            .filter(profile::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_profile(user_id: &str, country: &str) -> profile::Model {
        profile::Model {
            user_id: user_id.to_string(),
            name: Some("Test".to_string()),
            age: Some(25),
            avatar_url: None,
            continent: Some("Asia".to_string()),
            country: Some(country.to_string()),
            country_code: Some("JP".to_string()),
            state: None,
            district: None,
            city: None,
            is_public: true,
            badge_rank: None,
            total_images: 0,
            followers_count: 0,
            following_count: 0,
            average_rating: 0.0,
            total_ratings_received: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_user_id_found() {
        let profile = create_test_profile("u1", "Japan");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile.clone()]])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let result = repo.find_by_user_id("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn test_find_by_user_ids_empty_is_no_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ProfileRepository::new(db);
        let result = repo.find_by_user_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_user_ids_by_location() {
        let p1 = create_test_profile("u1", "Japan");
        let p2 = create_test_profile("u2", "Japan");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let result = repo
            .find_user_ids_by_location(Granularity::Country, "Japan")
            .await
            .unwrap();

        assert_eq!(result, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[tokio::test]
    async fn test_increment_followers_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        repo.increment_followers_count("u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_recompute_rating_aggregates() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        repo.recompute_rating_aggregates("u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_top_rated() {
        let mut p1 = create_test_profile("u1", "Japan");
        p1.average_rating = 9.5;
        p1.total_ratings_received = 12;
        let mut p2 = create_test_profile("u2", "Japan");
        p2.average_rating = 8.0;
        p2.total_ratings_received = 4;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = ProfileRepository::new(db);
        let result = repo.top_rated(3).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].user_id, "u1");
    }
}
