//! Leaderboard service.
//!
//! Location-scoped rankings. A viewer's own profile decides the scope:
//! the selected granularity field is matched exactly against all
//! profiles, and the leaderboard ranks images owned by the matching
//! users. Viewers without a usable location fall back to the global
//! (unscoped) ranking.

use chrono::Utc;
use serde::Serialize;
use shutter_common::{AppResult, Granularity, TopLimit};
use shutter_db::{
    entities::{image, profile},
    repositories::{ImageRepository, ProfileRepository},
};

use crate::services::streak::StreakService;

/// Maximum number of images returned by explore.
const EXPLORE_LIMIT: u64 = 50;

/// Resolved ranking scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Global ranking over all images.
    Unscoped,
    /// Ranking restricted to images owned by users in one location.
    Within {
        /// The matched location string.
        location_value: String,
        /// Users whose profile matches.
        user_ids: Vec<String>,
    },
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: u32,
    /// The ranked image.
    pub image: image::Model,
    /// The owner's profile, when one exists.
    pub owner: Option<profile::Model>,
    /// Running streak for the requested granularity.
    pub current_streak: i32,
    /// Longest streak ever reached for the requested granularity.
    pub longest_streak: i32,
}

/// Leaderboard service for business logic.
#[derive(Clone)]
pub struct LeaderboardService {
    image_repo: ImageRepository,
    profile_repo: ProfileRepository,
    streaks: StreakService,
}

impl LeaderboardService {
    /// Create a new leaderboard service.
    #[must_use]
    pub const fn new(
        image_repo: ImageRepository,
        profile_repo: ProfileRepository,
        streaks: StreakService,
    ) -> Self {
        Self {
            image_repo,
            profile_repo,
            streaks,
        }
    }

    /// Resolve the ranking scope for a viewer at a granularity.
    ///
    /// Anonymous viewers, viewers without a profile, viewers with the
    /// requested field unset, and locations matching nobody all fall back
    /// to [`Scope::Unscoped`].
    pub async fn resolve_scope(
        &self,
        viewer_id: Option<&str>,
        granularity: Granularity,
    ) -> AppResult<Scope> {
        let Some(viewer_id) = viewer_id else {
            return Ok(Scope::Unscoped);
        };

        let Some(viewer) = self.profile_repo.find_by_user_id(viewer_id).await? else {
            return Ok(Scope::Unscoped);
        };

        let Some(value) = viewer.location_value(granularity) else {
            return Ok(Scope::Unscoped);
        };
        let value = value.to_string();

        let user_ids = self
            .profile_repo
            .find_user_ids_by_location(granularity, &value)
            .await?;

        if user_ids.is_empty() {
            return Ok(Scope::Unscoped);
        }

        Ok(Scope::Within {
            location_value: value,
            user_ids,
        })
    }

    /// The ranked top images for a viewer's scope.
    ///
    /// Only rated images participate. Running the same query twice with no
    /// intervening writes yields the same ordering; ties break by rating
    /// count and then image ID. Viewing a leaderboard also advances the
    /// streak tracker for this granularity.
    pub async fn leaderboard(
        &self,
        viewer_id: Option<&str>,
        granularity: Granularity,
        top_limit: TopLimit,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let scope = self.resolve_scope(viewer_id, granularity).await?;

        let (location_value, owner_ids) = match &scope {
            Scope::Unscoped => (None, None),
            Scope::Within {
                location_value,
                user_ids,
            } => (Some(location_value.as_str()), Some(user_ids.as_slice())),
        };

        let images = self
            .image_repo
            .rank_top(owner_ids, true, top_limit.as_u64())
            .await?;

        let image_ids: Vec<String> = images.iter().map(|i| i.id.clone()).collect();

        self.streaks
            .track(granularity, location_value, &image_ids, Utc::now())
            .await?;

        self.assemble(images, granularity).await
    }

    /// An unranked sample of the scope's images for browsing.
    ///
    /// Unlike the leaderboard this includes never-rated images, caps at a
    /// fixed 50, and does not advance streaks.
    pub async fn explore(
        &self,
        viewer_id: Option<&str>,
        granularity: Granularity,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let scope = self.resolve_scope(viewer_id, granularity).await?;

        let owner_ids = match &scope {
            Scope::Unscoped => None,
            Scope::Within { user_ids, .. } => Some(user_ids.as_slice()),
        };

        let images = self
            .image_repo
            .rank_top(owner_ids, false, EXPLORE_LIMIT)
            .await?;

        self.assemble(images, granularity).await
    }

    /// Attach ranks, owner profiles, and streaks to an ordered image list.
    async fn assemble(
        &self,
        images: Vec<image::Model>,
        granularity: Granularity,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let image_ids: Vec<String> = images.iter().map(|i| i.id.clone()).collect();
        let mut owner_ids: Vec<String> = images.iter().map(|i| i.user_id.clone()).collect();
        owner_ids.sort();
        owner_ids.dedup();

        let profiles = self.profile_repo.find_by_user_ids(&owner_ids).await?;
        let streaks = self.streaks.streaks_for(granularity, &image_ids).await?;

        let entries = images
            .into_iter()
            .enumerate()
            .map(|(idx, img)| {
                let owner = profiles.iter().find(|p| p.user_id == img.user_id).cloned();
                let streak = streaks.iter().find(|s| s.image_id == img.id);

                LeaderboardEntry {
                    rank: u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1),
                    current_streak: streak.map_or(0, |s| s.current_streak),
                    longest_streak: streak.map_or(0, |s| s.longest_streak),
                    image: img,
                    owner,
                }
            })
            .collect();

        Ok(entries)
    }
}
