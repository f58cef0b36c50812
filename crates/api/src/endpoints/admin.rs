//! Admin endpoints.
//!
//! Report review, flagged/AI-detected image oversight, moderation
//! notifications, badge recompute, and the aggregate reconciliation sweep.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shutter_common::AppResult;
use shutter_db::entities::{admin_notification, report};

use crate::{
    endpoints::{images::ImageResponse, reports::ReportResponse},
    extractors::AdminUser,
    middleware::AppState,
    response::ApiResponse,
};

const DEFAULT_LIST_LIMIT: u64 = 50;

/// Report listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsQuery {
    #[serde(default = "default_status")]
    pub status: report::ReportStatus,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_status() -> report::ReportStatus {
    report::ReportStatus::Pending
}

const fn default_limit() -> u64 {
    DEFAULT_LIST_LIMIT
}

/// List reports by status.
async fn list_reports(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = state
        .report_service
        .list(query.status, query.limit.min(200))
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Dismiss a pending report.
async fn dismiss_report(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.dismiss(&report_id).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Uphold a pending report, flagging the image.
async fn remove_report(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.remove(&report_id).await?;
    Ok(ApiResponse::ok(report.into()))
}

/// Image listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListImagesQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// List flagged images.
async fn list_flagged_images(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListImagesQuery>,
) -> AppResult<ApiResponse<Vec<ImageResponse>>> {
    let images = state
        .report_service
        .flagged_images(query.limit.min(200))
        .await?;

    Ok(ApiResponse::ok(images.into_iter().map(Into::into).collect()))
}

/// List images the external classifier marked as AI-generated.
async fn list_ai_detected_images(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListImagesQuery>,
) -> AppResult<ApiResponse<Vec<ImageResponse>>> {
    let images = state
        .report_service
        .ai_detected_images(query.limit.min(200))
        .await?;

    Ok(ApiResponse::ok(images.into_iter().map(Into::into).collect()))
}

/// Clear an image's moderation flag.
async fn unflag_image(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.report_service.unflag_image(&image_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Notification listing query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Admin notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub notification_type: String,
    pub message: String,
    pub image_id: Option<String>,
    pub user_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<admin_notification::Model> for NotificationResponse {
    fn from(n: admin_notification::Model) -> Self {
        Self {
            id: n.id,
            notification_type: n.notification_type,
            message: n.message,
            image_id: n.image_id,
            user_id: n.user_id,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// List moderation notifications.
async fn list_notifications(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let notifications = state
        .report_service
        .notifications(query.unread_only, query.limit.min(200))
        .await?;

    Ok(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    ))
}

/// Mark a notification as read.
async fn read_notification(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .report_service
        .mark_notification_read(&notification_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Badge recompute response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecomputeResponse {
    pub badged_user_ids: Vec<String>,
}

/// Recompute the global top-3 badges now.
async fn recompute_badges(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<BadgeRecomputeResponse>> {
    let badged_user_ids = state.badge_service.recompute().await?;
    Ok(ApiResponse::ok(BadgeRecomputeResponse { badged_user_ids }))
}

/// Reconciliation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub reconciled: u64,
}

/// Recompute every rating aggregate from the raw rating rows.
async fn reconcile_aggregates(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReconcileResponse>> {
    let reconciled = state.rating_service.reconcile_all().await?;
    Ok(ApiResponse::ok(ReconcileResponse { reconciled }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/{report_id}/dismiss", post(dismiss_report))
        .route("/reports/{report_id}/remove", post(remove_report))
        .route("/images/flagged", get(list_flagged_images))
        .route("/images/ai-detected", get(list_ai_detected_images))
        .route("/images/{image_id}/unflag", post(unflag_image))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{notification_id}/read", post(read_notification))
        .route("/badges/recompute", post(recompute_badges))
        .route("/aggregates/reconcile", post(reconcile_aggregates))
}
