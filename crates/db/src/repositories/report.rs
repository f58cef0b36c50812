//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use shutter_common::{AppError, AppResult};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a reporter already has a pending report on an image.
    pub async fn has_pending(&self, reporter_id: &str, image_id: &str) -> AppResult<bool> {
        let existing = Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .filter(report::Column::ImageId.eq(image_id))
            .filter(report::Column::Status.eq(report::ReportStatus::Pending))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(existing.is_some())
    }

    /// Create a report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reports by status, newest first.
    pub async fn find_by_status(
        &self,
        status: report::ReportStatus,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::Status.eq(status))
            .order_by_desc(report::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, status: report::ReportStatus) -> report::Model {
        report::Model {
            id: id.to_string(),
            image_id: "i1".to_string(),
            reporter_id: "u1".to_string(),
            reported_user_id: "u2".to_string(),
            reason: "inappropriate".to_string(),
            report_type: report::ReportType::Spam,
            description: None,
            status,
            reviewed_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_pending_true() {
        let report = create_test_report("rp1", report::ReportStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.has_pending("u1", "i1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_has_pending_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.has_pending("u1", "i2").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let r1 = create_test_report("rp1", report::ReportStatus::Pending);
        let r2 = create_test_report("rp2", report::ReportStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo
            .find_by_status(report::ReportStatus::Pending, 50)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }
}
