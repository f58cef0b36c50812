//! Admin notification repository.

use std::sync::Arc;

use crate::entities::{AdminNotification, admin_notification};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use shutter_common::{AppError, AppResult};

/// Admin notification repository for database operations.
#[derive(Clone)]
pub struct AdminNotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminNotificationRepository {
    /// Create a new admin notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a notification.
    pub async fn create(
        &self,
        model: admin_notification::ActiveModel,
    ) -> AppResult<admin_notification::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List notifications, newest first.
    pub async fn list(
        &self,
        unread_only: bool,
        limit: u64,
    ) -> AppResult<Vec<admin_notification::Model>> {
        let mut query = AdminNotification::find().order_by_desc(admin_notification::Column::Id);

        if unread_only {
            query = query.filter(admin_notification::Column::IsRead.eq(false));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark a notification as read.
    pub async fn mark_as_read(&self, id: &str) -> AppResult<u64> {
        use sea_orm::UpdateResult;

        let result: UpdateResult = AdminNotification::update_many()
            .filter(admin_notification::Column::Id.eq(id))
            .filter(admin_notification::Column::IsRead.eq(false))
            .col_expr(admin_notification::Column::IsRead, true.into())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_notification(id: &str, is_read: bool) -> admin_notification::Model {
        admin_notification::Model {
            id: id.to_string(),
            notification_type: "report_removed".to_string(),
            message: "Image removed after review".to_string(),
            image_id: Some("i1".to_string()),
            user_id: Some("u2".to_string()),
            is_read,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_unread_only() {
        let n1 = create_test_notification("n1", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n1]])
                .into_connection(),
        );

        let repo = AdminNotificationRepository::new(db);
        let result = repo.list(true, 50).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(!result[0].is_read);
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = AdminNotificationRepository::new(db);
        let affected = repo.mark_as_read("n1").await.unwrap();

        assert_eq!(affected, 1);
    }
}
