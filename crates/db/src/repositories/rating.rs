//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use shutter_common::{AppError, AppResult};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a rating by user and image.
    pub async fn find_by_user_and_image(
        &self,
        user_id: &str,
        image_id: &str,
    ) -> AppResult<Option<rating::Model>> {
        Rating::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::ImageId.eq(image_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a rating, or replace the score of an existing one.
    ///
    /// Keyed on the unique (user, image) pair, so re-rating never produces a
    /// second row.
    pub async fn upsert(&self, model: rating::ActiveModel) -> AppResult<()> {
        Rating::insert(model)
            .on_conflict(
                OnConflict::columns([rating::Column::UserId, rating::Column::ImageId])
                    .update_columns([rating::Column::Score, rating::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Ratings submitted by a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::UserId.eq(user_id))
            .order_by_desc(rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
