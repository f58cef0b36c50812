//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use shutter_core::{
    AccountService, BadgeService, FollowService, ImageService, LeaderboardService, ProfileService,
    RatingService, ReportService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub profile_service: ProfileService,
    pub image_service: ImageService,
    pub rating_service: RatingService,
    pub leaderboard_service: LeaderboardService,
    pub follow_service: FollowService,
    pub report_service: ReportService,
    pub badge_service: BadgeService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stores it in request extensions;
/// handlers opt in through the `AuthUser` extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.account_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
