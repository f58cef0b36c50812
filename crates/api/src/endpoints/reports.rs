//! Report endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use shutter_common::AppResult;
use shutter_core::services::report::SubmitReportInput;
use shutter_db::entities::report;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub image_id: String,
    pub report_type: report::ReportType,
    pub reason: String,
    pub status: report::ReportStatus,
    pub created_at: String,
}

impl From<report::Model> for ReportResponse {
    fn from(r: report::Model) -> Self {
        Self {
            id: r.id,
            image_id: r.image_id,
            report_type: r.report_type,
            reason: r.reason,
            status: r.status,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Report an image.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitReportInput>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state.report_service.submit(&user.id, req).await?;
    Ok(ApiResponse::ok(report.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
