//! Rating endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Submit rating request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub image_id: String,
    pub score: i32,
}

/// Rating response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub id: String,
    pub image_id: String,
    pub score: i32,
    pub created_at: String,
}

/// Submit (or replace) a score on an image.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitRatingRequest>,
) -> AppResult<ApiResponse<RatingResponse>> {
    let rating = state
        .rating_service
        .submit(&user.id, &req.image_id, req.score)
        .await?;

    Ok(ApiResponse::ok(RatingResponse {
        id: rating.id,
        image_id: rating.image_id,
        score: rating.score,
        created_at: rating.created_at.to_rfc3339(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
