//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use shutter_common::AppResult;
use shutter_core::services::account::{SigninInput, SignupInput};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Authenticated session response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub token: Option<String>,
}

impl From<shutter_db::entities::user::Model> for SessionResponse {
    fn from(u: shutter_db::entities::user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            is_admin: u.is_admin,
            token: u.token,
        }
    }
}

/// Register a new account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.account_service.signup(req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Sign in with email-or-username and password.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.account_service.signin(req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Token regeneration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a fresh API token for the caller.
async fn regenerate_token(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.account_service.regenerate_token(&user.id).await?;
    Ok(ApiResponse::ok(TokenResponse { token }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/regenerate-token", post(regenerate_token))
}
