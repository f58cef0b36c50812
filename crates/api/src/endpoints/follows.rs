//! Follow endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Follow/unfollow request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

/// Follow state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStateResponse {
    pub following: bool,
}

/// Follow a user.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    state.follow_service.follow(&user.id, &req.user_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse { following: true }))
}

/// Unfollow a user.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    state.follow_service.unfollow(&user.id, &req.user_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse { following: false }))
}

/// Whether the caller follows a user.
async fn status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<FollowStateResponse>> {
    let following = state.follow_service.is_following(&user.id, &user_id).await?;
    Ok(ApiResponse::ok(FollowStateResponse { following }))
}

/// IDs of users following the given user.
async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    Ok(ApiResponse::ok(state.follow_service.followers(&user_id).await?))
}

/// IDs of users the given user follows.
async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<String>>> {
    Ok(ApiResponse::ok(state.follow_service.following(&user_id).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/delete", post(delete))
        .route("/status/{user_id}", get(status))
        .route("/followers/{user_id}", get(followers))
        .route("/following/{user_id}", get(following))
}
