//! API endpoints.

mod admin;
mod auth;
mod follows;
mod images;
mod leaderboard;
mod profiles;
mod ratings;
mod reports;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profiles", profiles::router())
        .nest("/images", images::router())
        .nest("/ratings", ratings::router())
        .nest("/leaderboard", leaderboard::router())
        .nest("/follows", follows::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
}
