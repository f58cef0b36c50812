//! Badge service.
//!
//! Assigns the global top-3 badge ranks to profiles.

use shutter_common::AppResult;
use shutter_db::repositories::ProfileRepository;

/// Number of profiles that carry a badge.
const BADGE_COUNT: u64 = 3;

/// Badge service for business logic.
#[derive(Clone)]
pub struct BadgeService {
    profile_repo: ProfileRepository,
}

impl BadgeService {
    /// Create a new badge service.
    #[must_use]
    pub const fn new(profile_repo: ProfileRepository) -> Self {
        Self { profile_repo }
    }

    /// Recompute badge ranks from the global standing.
    ///
    /// Orders profiles with at least one rating received by average rating,
    /// then rating count, then user ID. The top three get ranks 1 to 3;
    /// everyone else is cleared. Returns the badged user IDs in rank order.
    pub async fn recompute(&self) -> AppResult<Vec<String>> {
        let top = self.profile_repo.top_rated(BADGE_COUNT).await?;

        self.profile_repo.clear_badge_ranks().await?;

        let mut badged = Vec::with_capacity(top.len());
        for (idx, profile) in top.into_iter().enumerate() {
            let rank = i32::try_from(idx).unwrap_or(i32::MAX).saturating_add(1);
            self.profile_repo
                .set_badge_rank(&profile.user_id, rank)
                .await?;
            badged.push(profile.user_id);
        }

        tracing::info!(count = badged.len(), "Recomputed badge ranks");

        Ok(badged)
    }
}
