//! Admin notification entity (append-only moderation notices).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Kind of event (e.g. "report_removed", "image_flagged").
    pub notification_type: String,

    pub message: String,

    #[sea_orm(nullable)]
    pub image_id: Option<String>,

    /// The user the notice concerns, if any.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
