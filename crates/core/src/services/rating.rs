//! Rating service.
//!
//! Submitting scores and keeping the denormalized aggregates in step
//! with the rating rows.

use sea_orm::Set;
use shutter_common::{AppError, AppResult, IdGenerator};
use shutter_db::{
    entities::rating,
    repositories::{ImageRepository, ProfileRepository, RatingRepository},
};

/// Rating service for business logic.
#[derive(Clone)]
pub struct RatingService {
    rating_repo: RatingRepository,
    image_repo: ImageRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub fn new(
        rating_repo: RatingRepository,
        image_repo: ImageRepository,
        profile_repo: ProfileRepository,
    ) -> Self {
        Self {
            rating_repo,
            image_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit (or replace) a rating on an image.
    ///
    /// After the upsert the image and owner aggregates are recomputed from
    /// the rating rows, each in a single atomic statement. A failed
    /// recompute after a successful upsert is logged and surfaced.
    pub async fn submit(
        &self,
        rater_id: &str,
        image_id: &str,
        score: i32,
    ) -> AppResult<rating::Model> {
        if !(rating::MIN_SCORE..=rating::MAX_SCORE).contains(&score) {
            return Err(AppError::Validation(format!(
                "Score must be between {} and {}",
                rating::MIN_SCORE,
                rating::MAX_SCORE
            )));
        }

        let image = self.image_repo.get_by_id(image_id).await?;

        if image.user_id == rater_id {
            return Err(AppError::SelfRating);
        }

        let now = chrono::Utc::now();
        let model = rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(rater_id.to_string()),
            image_id: Set(image_id.to_string()),
            score: Set(score),
            created_at: Set(now.into()),
            updated_at: Set(Some(now.into())),
        };

        self.rating_repo.upsert(model).await?;

        if let Err(e) = self.image_repo.recompute_aggregates(image_id).await {
            tracing::error!(error = %e, image_id = %image_id, "Image aggregate recompute failed after rating upsert");
            return Err(e);
        }
        if let Err(e) = self
            .profile_repo
            .recompute_rating_aggregates(&image.user_id)
            .await
        {
            tracing::error!(error = %e, user_id = %image.user_id, "Profile aggregate recompute failed after rating upsert");
            return Err(e);
        }

        // The upsert coalesces insert and replace, so re-read the row
        self.rating_repo
            .find_by_user_and_image(rater_id, image_id)
            .await?
            .ok_or_else(|| AppError::Internal("Rating vanished after upsert".to_string()))
    }

    /// The score a user gave an image, if any.
    pub async fn get(&self, rater_id: &str, image_id: &str) -> AppResult<Option<i32>> {
        Ok(self
            .rating_repo
            .find_by_user_and_image(rater_id, image_id)
            .await?
            .map(|r| r.score))
    }

    /// Recompute every image and profile aggregate from the raw rating rows.
    ///
    /// Recovery sweep for aggregates that have drifted (crash between upsert
    /// and recompute, manual data edits).
    pub async fn reconcile_all(&self) -> AppResult<u64> {
        let image_ids = self.image_repo.all_ids().await?;
        let owner_ids = self.image_repo.all_owner_ids().await?;

        let mut reconciled = 0u64;
        for id in &image_ids {
            self.image_repo.recompute_aggregates(id).await?;
            reconciled += 1;
        }
        for owner in &owner_ids {
            self.profile_repo.recompute_rating_aggregates(owner).await?;
            reconciled += 1;
        }

        tracing::info!(
            images = image_ids.len(),
            profiles = owner_ids.len(),
            "Reconciled rating aggregates"
        );

        Ok(reconciled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use shutter_db::entities::image;
    use std::sync::Arc;

    fn create_test_image(id: &str, user_id: &str) -> image::Model {
        image::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            image_url: "/files/test.jpg".to_string(),
            title: None,
            caption: None,
            description: None,
            average_rating: 0.0,
            total_ratings: 0,
            is_flagged: false,
            flag_reason: None,
            ai_detected: None,
            ai_confidence: None,
            ai_detection_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_rating(id: &str, user_id: &str, image_id: &str, score: i32) -> rating::Model {
        rating::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            image_id: image_id.to_string(),
            score,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_score() {
        let rating_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let image_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            ImageRepository::new(image_db),
            ProfileRepository::new(profile_db),
        );

        for score in [0, 11, -3] {
            let result = service.submit("u1", "i1", score).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_own_image() {
        let image = create_test_image("i1", "u1");

        let rating_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let image_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image]])
                .into_connection(),
        );
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            ImageRepository::new(image_db),
            ProfileRepository::new(profile_db),
        );

        let result = service.submit("u1", "i1", 7).await;
        assert!(matches!(result, Err(AppError::SelfRating)));
    }

    #[tokio::test]
    async fn test_submit_missing_image() {
        let rating_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let image_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<image::Model>::new()])
                .into_connection(),
        );
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            ImageRepository::new(image_db),
            ProfileRepository::new(profile_db),
        );

        let result = service.submit("u1", "missing", 7).await;
        assert!(matches!(result, Err(AppError::ImageNotFound)));
    }

    #[tokio::test]
    async fn test_submit_happy_path() {
        let image = create_test_image("i1", "owner");
        let stored = create_test_rating("r1", "u1", "i1", 7);

        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // upsert fetches the id via RETURNING, then the re-read
                .append_query_results([[stored.clone()], [stored]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let image_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[image]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            ImageRepository::new(image_db),
            ProfileRepository::new(profile_db),
        );

        let result = service.submit("u1", "i1", 7).await.unwrap();
        assert_eq!(result.score, 7);
    }

    #[tokio::test]
    async fn test_get_score() {
        let stored = create_test_rating("r1", "u1", "i1", 9);

        let rating_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let image_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = RatingService::new(
            RatingRepository::new(rating_db),
            ImageRepository::new(image_db),
            ProfileRepository::new(profile_db),
        );

        let result = service.get("u1", "i1").await.unwrap();
        assert_eq!(result, Some(9));
    }
}
