//! Streak repository.

use std::sync::Arc;

use crate::entities::{Streak, streak};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use shutter_common::{AppError, AppResult};

/// Streak repository for database operations.
#[derive(Clone)]
pub struct StreakRepository {
    db: Arc<DatabaseConnection>,
}

impl StreakRepository {
    /// Create a new streak repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the streak row for an image under a scope kind.
    pub async fn find_by_image_and_type(
        &self,
        image_id: &str,
        streak_type: &str,
    ) -> AppResult<Option<streak::Model>> {
        Streak::find()
            .filter(streak::Column::ImageId.eq(image_id))
            .filter(streak::Column::StreakType.eq(streak_type))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Streak rows for a set of images under a scope kind.
    pub async fn find_by_images(
        &self,
        image_ids: &[String],
        streak_type: &str,
    ) -> AppResult<Vec<streak::Model>> {
        if image_ids.is_empty() {
            return Ok(Vec::new());
        }

        Streak::find()
            .filter(streak::Column::ImageId.is_in(image_ids.iter().map(String::as_str)))
            .filter(streak::Column::StreakType.eq(streak_type))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a streak row.
    pub async fn create(&self, model: streak::ActiveModel) -> AppResult<streak::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a streak row.
    pub async fn update(&self, model: streak::ActiveModel) -> AppResult<streak::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Zero the running streak of every row under a scope kind whose image is
    /// not in the surviving set.
    pub async fn reset_except(&self, streak_type: &str, keep_image_ids: &[String]) -> AppResult<()> {
        let mut query = Streak::update_many()
            .col_expr(streak::Column::CurrentStreak, Expr::value(0))
            .filter(streak::Column::StreakType.eq(streak_type))
            .filter(streak::Column::CurrentStreak.gt(0));

        if !keep_image_ids.is_empty() {
            query = query
                .filter(streak::Column::ImageId.is_not_in(keep_image_ids.iter().map(String::as_str)));
        }

        query
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
