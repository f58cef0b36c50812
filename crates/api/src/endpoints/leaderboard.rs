//! Leaderboard and explore endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use shutter_common::{AppResult, Granularity, TopLimit};
use shutter_core::LeaderboardEntry;

use crate::{
    endpoints::{images::ImageResponse, profiles::ProfileResponse},
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Leaderboard query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,
    #[serde(default)]
    pub limit: TopLimit,
}

const fn default_granularity() -> Granularity {
    Granularity::Country
}

/// Explore query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreQuery {
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,
}

/// One leaderboard row.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub rank: u32,
    pub image: ImageResponse,
    pub owner: Option<ProfileResponse>,
    pub current_streak: i32,
    pub longest_streak: i32,
}

impl From<LeaderboardEntry> for EntryResponse {
    fn from(e: LeaderboardEntry) -> Self {
        Self {
            rank: e.rank,
            image: e.image.into(),
            owner: e.owner.map(Into::into),
            current_streak: e.current_streak,
            longest_streak: e.longest_streak,
        }
    }
}

/// Ranked top images for the viewer's location scope.
async fn leaderboard(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<ApiResponse<Vec<EntryResponse>>> {
    let entries = state
        .leaderboard_service
        .leaderboard(
            viewer.as_ref().map(|u| u.id.as_str()),
            query.granularity,
            query.limit,
        )
        .await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

/// Unranked sample of the scope's images.
async fn explore(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> AppResult<ApiResponse<Vec<EntryResponse>>> {
    let entries = state
        .leaderboard_service
        .explore(viewer.as_ref().map(|u| u.id.as_str()), query.granularity)
        .await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leaderboard))
        .route("/explore", get(explore))
}
