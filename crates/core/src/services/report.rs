//! Report service.
//!
//! User-submitted moderation reports and their admin review flow.

use sea_orm::Set;
use serde::Deserialize;
use shutter_common::{AppError, AppResult, IdGenerator};
use shutter_db::{
    entities::{admin_notification, image, report},
    repositories::{AdminNotificationRepository, ImageRepository, ReportRepository},
};
use validator::Validate;

/// Report submission input.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportInput {
    /// The reported image.
    pub image_id: String,
    /// Report category.
    pub report_type: report::ReportType,
    /// Short reason.
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
    /// Optional longer description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    image_repo: ImageRepository,
    notification_repo: AdminNotificationRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub fn new(
        report_repo: ReportRepository,
        image_repo: ImageRepository,
        notification_repo: AdminNotificationRepository,
    ) -> Self {
        Self {
            report_repo,
            image_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a report on an image.
    ///
    /// A reporter may hold at most one pending report per image.
    pub async fn submit(
        &self,
        reporter_id: &str,
        input: SubmitReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;

        let image = self.image_repo.get_by_id(&input.image_id).await?;

        if self
            .report_repo
            .has_pending(reporter_id, &input.image_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You already have a pending report on this image".to_string(),
            ));
        }

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            image_id: Set(input.image_id),
            reporter_id: Set(reporter_id.to_string()),
            reported_user_id: Set(image.user_id),
            reason: Set(input.reason),
            report_type: Set(input.report_type),
            description: Set(input.description),
            status: Set(report::ReportStatus::Pending),
            ..Default::default()
        };

        let created = self.report_repo.create(model).await?;

        tracing::info!(report_id = %created.id, image_id = %created.image_id, "Report submitted");

        Ok(created)
    }

    /// List reports by status (admin).
    pub async fn list(
        &self,
        status: report::ReportStatus,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_status(status, limit).await
    }

    /// Dismiss a pending report (admin).
    pub async fn dismiss(&self, report_id: &str) -> AppResult<report::Model> {
        let report = self.pending_report(report_id).await?;

        let model = report::ActiveModel {
            id: Set(report.id),
            status: Set(report::ReportStatus::Dismissed),
            reviewed_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        };

        self.report_repo.update(model).await
    }

    /// Uphold a pending report (admin): flag the image and notify.
    pub async fn remove(&self, report_id: &str) -> AppResult<report::Model> {
        let report = self.pending_report(report_id).await?;

        self.image_repo
            .set_flagged(&report.image_id, &report.reason)
            .await?;

        let model = report::ActiveModel {
            id: Set(report.id.clone()),
            status: Set(report::ReportStatus::Removed),
            reviewed_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        };

        let updated = self.report_repo.update(model).await?;

        let notification = admin_notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            notification_type: Set("report_removed".to_string()),
            message: Set(format!(
                "Image {} flagged after report review: {}",
                report.image_id, report.reason
            )),
            image_id: Set(Some(report.image_id)),
            user_id: Set(Some(report.reported_user_id)),
            is_read: Set(false),
            ..Default::default()
        };
        self.notification_repo.create(notification).await?;

        Ok(updated)
    }

    /// List flagged images (admin).
    pub async fn flagged_images(&self, limit: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo.find_flagged(limit).await
    }

    /// List images the external classifier marked as AI-generated (admin).
    pub async fn ai_detected_images(&self, limit: u64) -> AppResult<Vec<image::Model>> {
        self.image_repo.find_ai_detected(limit).await
    }

    /// Clear an image's moderation flag (admin).
    pub async fn unflag_image(&self, image_id: &str) -> AppResult<()> {
        self.image_repo.get_by_id(image_id).await?;
        self.image_repo.clear_flag(image_id).await?;

        tracing::info!(image_id = %image_id, "Cleared image flag");

        Ok(())
    }

    /// List admin notifications.
    pub async fn notifications(
        &self,
        unread_only: bool,
        limit: u64,
    ) -> AppResult<Vec<admin_notification::Model>> {
        self.notification_repo.list(unread_only, limit).await
    }

    /// Mark an admin notification as read.
    pub async fn mark_notification_read(&self, id: &str) -> AppResult<()> {
        self.notification_repo.mark_as_read(id).await?;
        Ok(())
    }

    async fn pending_report(&self, report_id: &str) -> AppResult<report::Model> {
        let report = self
            .report_repo
            .find_by_id(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        if report.status != report::ReportStatus::Pending {
            return Err(AppError::Conflict("Report already reviewed".to_string()));
        }

        Ok(report)
    }
}
