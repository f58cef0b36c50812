//! Streak service.
//!
//! Streaks count consecutive ranking periods in which an image stays in
//! the top set for a granularity. A ranking period is a fixed-length
//! window of `streak.period_hours`, measured in whole periods since the
//! Unix epoch, UTC.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use shutter_common::{AppResult, Granularity, IdGenerator, StreakConfig};
use shutter_db::{entities::streak, repositories::StreakRepository};

/// Scope string recorded for streaks computed without a location filter.
pub const UNSCOPED_LOCATION: &str = "*";

/// Streak service for business logic.
#[derive(Clone)]
pub struct StreakService {
    streak_repo: StreakRepository,
    period_hours: u32,
    id_gen: IdGenerator,
}

impl StreakService {
    /// Create a new streak service.
    #[must_use]
    pub fn new(streak_repo: StreakRepository, config: &StreakConfig) -> Self {
        Self {
            streak_repo,
            period_hours: config.period_hours.max(1),
            id_gen: IdGenerator::new(),
        }
    }

    /// Index of the ranking period containing `at`.
    #[must_use]
    pub fn period_index(&self, at: DateTime<Utc>) -> i64 {
        let period_secs = i64::from(self.period_hours) * 3600;
        at.timestamp().div_euclid(period_secs)
    }

    /// Record that `top_image_ids` are the current top set for a granularity.
    ///
    /// Rows for images in the top set are created or advanced according to
    /// which period they were last seen in; rows for images that fell out
    /// have their running streak reset to zero.
    pub async fn track(
        &self,
        granularity: Granularity,
        location_value: Option<&str>,
        top_image_ids: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let streak_type = granularity.as_str();
        let location = location_value.unwrap_or(UNSCOPED_LOCATION);
        let current_period = self.period_index(now);

        for image_id in top_image_ids {
            let existing = self
                .streak_repo
                .find_by_image_and_type(image_id, streak_type)
                .await?;

            match existing {
                None => {
                    let model = streak::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        image_id: Set(image_id.clone()),
                        streak_type: Set(streak_type.to_string()),
                        location_value: Set(location.to_string()),
                        current_streak: Set(1),
                        longest_streak: Set(1),
                        last_in_top_at: Set(Some(now.into())),
                        ..Default::default()
                    };
                    self.streak_repo.create(model).await?;
                }
                Some(row) => {
                    let last_period = row
                        .last_in_top_at
                        .map(|t| self.period_index(t.with_timezone(&Utc)));

                    let next = match last_period {
                        // Same period: an idempotent re-query
                        Some(p) if p == current_period => continue,
                        // Immediately preceding period: streak continues
                        Some(p) if p == current_period - 1 => row.current_streak + 1,
                        // Gap (or never seen in top): streak restarts
                        _ => 1,
                    };

                    let model = streak::ActiveModel {
                        id: Set(row.id),
                        current_streak: Set(next),
                        longest_streak: Set(row.longest_streak.max(next)),
                        location_value: Set(location.to_string()),
                        last_in_top_at: Set(Some(now.into())),
                        updated_at: Set(Some(now.into())),
                        ..Default::default()
                    };
                    self.streak_repo.update(model).await?;
                }
            }
        }

        // Everything tracked under this granularity but no longer in the top
        // set loses its running streak; longest_streak is retained
        self.streak_repo
            .reset_except(streak_type, top_image_ids)
            .await?;

        Ok(())
    }

    /// Current streaks for a set of images under a granularity, keyed by
    /// image ID.
    pub async fn streaks_for(
        &self,
        granularity: Granularity,
        image_ids: &[String],
    ) -> AppResult<Vec<streak::Model>> {
        self.streak_repo
            .find_by_images(image_ids, granularity.as_str())
            .await
    }
}
