//! Profile endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use shutter_common::AppResult;
use shutter_core::services::profile::UpdateProfileInput;
use shutter_db::entities::profile;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub avatar_url: Option<String>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub is_public: bool,
    pub badge_rank: Option<i32>,
    pub total_images: i32,
    pub followers_count: i32,
    pub following_count: i32,
    pub average_rating: f64,
    pub total_ratings_received: i32,
    pub created_at: String,
}

impl From<profile::Model> for ProfileResponse {
    fn from(p: profile::Model) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name,
            age: p.age,
            avatar_url: p.avatar_url,
            continent: p.continent,
            country: p.country,
            country_code: p.country_code,
            state: p.state,
            district: p.district,
            city: p.city,
            is_public: p.is_public,
            badge_rank: p.badge_rank,
            total_images: p.total_images,
            followers_count: p.followers_count,
            following_count: p.following_count,
            average_rating: p.average_rating,
            total_ratings_received: p.total_ratings_received,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Get the caller's own profile.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.get_own(&user.id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Get a user's profile.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state
        .profile_service
        .get(viewer.as_ref().map(|u| u.id.as_str()), &user_id)
        .await?;
    Ok(ApiResponse::ok(profile.into()))
}

/// Update the caller's profile.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.update(&user.id, req).await?;
    Ok(ApiResponse::ok(profile.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).put(update))
        .route("/{user_id}", get(show))
}
