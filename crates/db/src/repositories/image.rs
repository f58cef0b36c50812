//! Image repository.

use std::sync::Arc;

use crate::entities::{Image, image};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
    sea_query::Expr,
};
use shutter_common::{AppError, AppResult};

/// Image repository for database operations.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<DatabaseConnection>,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an image by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<image::Model>> {
        Image::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an image by ID, or fail.
    pub async fn get_by_id(&self, id: &str) -> AppResult<image::Model> {
        self.find_by_id(id).await?.ok_or(AppError::ImageNotFound)
    }

    /// List a user's images, newest first.
    pub async fn find_by_owner(&self, user_id: &str) -> AppResult<Vec<image::Model>> {
        Image::find()
            .filter(image::Column::UserId.eq(user_id))
            .order_by_desc(image::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new image.
    pub async fn create(&self, model: image::ActiveModel) -> AppResult<image::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an image.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let image = self.find_by_id(id).await?;
        if let Some(i) = image {
            i.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Recompute the image's rating aggregates from the live rating rows.
    ///
    /// A single statement so the average and count always come from the same
    /// snapshot of the data.
    pub async fn recompute_aggregates(&self, id: &str) -> AppResult<()> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "image" SET
                "average_rating" = COALESCE((
                    SELECT AVG("rating"."score")::float8 FROM "rating"
                    WHERE "rating"."image_id" = "image"."id"
                ), 0),
                "total_ratings" = (
                    SELECT COUNT(*) FROM "rating"
                    WHERE "rating"."image_id" = "image"."id"
                ),
                "updated_at" = CURRENT_TIMESTAMP
            WHERE "id" = $1"#,
            [id.into()],
        );

        self.db
            .execute(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Top-ranked images, ordered by average rating, then rating count, then
    /// ID for a stable tie-break.
    ///
    /// `owner_ids` narrows to images owned by those users; `require_rated`
    /// drops images that have never been rated.
    pub async fn rank_top(
        &self,
        owner_ids: Option<&[String]>,
        require_rated: bool,
        limit: u64,
    ) -> AppResult<Vec<image::Model>> {
        let mut query = Image::find();

        if let Some(ids) = owner_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(image::Column::UserId.is_in(ids.iter().map(String::as_str)));
        }

        if require_rated {
            query = query.filter(image::Column::TotalRatings.gt(0));
        }

        query
            .order_by_desc(image::Column::AverageRating)
            .order_by_desc(image::Column::TotalRatings)
            .order_by_asc(image::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flag an image with a moderation reason.
    pub async fn set_flagged(&self, id: &str, reason: &str) -> AppResult<()> {
        Image::update_many()
            .col_expr(image::Column::IsFlagged, Expr::value(true))
            .col_expr(image::Column::FlagReason, Expr::value(reason))
            .filter(image::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Clear an image's moderation flag.
    pub async fn clear_flag(&self, id: &str) -> AppResult<()> {
        Image::update_many()
            .col_expr(image::Column::IsFlagged, Expr::value(false))
            .col_expr(image::Column::FlagReason, Expr::value(Option::<String>::None))
            .filter(image::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Flagged images, newest first.
    pub async fn find_flagged(&self, limit: u64) -> AppResult<Vec<image::Model>> {
        Image::find()
            .filter(image::Column::IsFlagged.eq(true))
            .order_by_desc(image::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Images the external classifier marked as AI-generated, newest first.
    pub async fn find_ai_detected(&self, limit: u64) -> AppResult<Vec<image::Model>> {
        Image::find()
            .filter(image::Column::AiDetected.eq(true))
            .order_by_desc(image::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All image IDs (for full reconciliation sweeps).
    pub async fn all_ids(&self) -> AppResult<Vec<String>> {
        let images = Image::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(images.into_iter().map(|i| i.id).collect())
    }

    /// All distinct owner IDs (for full reconciliation sweeps).
    pub async fn all_owner_ids(&self) -> AppResult<Vec<String>> {
        let images = Image::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut ids: Vec<String> = images.into_iter().map(|i| i.user_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_image(id: &str, user_id: &str, avg: f64, total: i32) -> image::Model {
        image::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            image_url: "/files/test.jpg".to_string(),
            title: Some("Sunset".to_string()),
            caption: None,
            description: None,
            average_rating: avg,
            total_ratings: total,
            is_flagged: false,
            flag_reason: None,
            ai_detected: None,
            ai_confidence: None,
            ai_detection_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let image = create_test_image("i1", "u1", 7.5, 4);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image.clone()]])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let result = repo.get_by_id("i1").await.unwrap();

        assert_eq!(result.id, "i1");
        assert_eq!(result.total_ratings, 4);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<image::Model>::new()])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::ImageNotFound)));
    }

    #[tokio::test]
    async fn test_rank_top_empty_scope_is_no_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ImageRepository::new(db);
        let result = repo.rank_top(Some(&[]), true, 10).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_rank_top_returns_rows() {
        let i1 = create_test_image("i1", "u1", 9.0, 10);
        let i2 = create_test_image("i2", "u2", 8.5, 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[i1, i2]])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let result = repo.rank_top(None, true, 10).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "i1");
    }

    #[tokio::test]
    async fn test_recompute_aggregates() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        repo.recompute_aggregates("i1").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_flagged() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        repo.set_flagged("i1", "nudity").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_flag() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        repo.clear_flag("i1").await.unwrap();
    }

    #[tokio::test]
    async fn test_find_flagged() {
        let mut flagged = create_test_image("i1", "u1", 5.0, 2);
        flagged.is_flagged = true;
        flagged.flag_reason = Some("nudity".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[flagged]])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let result = repo.find_flagged(50).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_flagged);
    }

    #[tokio::test]
    async fn test_find_ai_detected() {
        let mut detected = create_test_image("i1", "u1", 5.0, 2);
        detected.ai_detected = Some(true);
        detected.ai_confidence = Some(91);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[detected]])
                .into_connection(),
        );

        let repo = ImageRepository::new(db);
        let result = repo.find_ai_detected(50).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ai_detected, Some(true));
    }
}
