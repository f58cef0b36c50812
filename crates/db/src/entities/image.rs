//! Image entity (uploaded photos and their derived rating aggregates).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The owner. Set at upload, immutable thereafter.
    pub user_id: String,

    pub image_url: String,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    #[sea_orm(nullable)]
    pub caption: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Mean of all rating scores for this image (derived).
    ///
    /// Invariant: equals `mean(rating.score where rating.image_id = id)`,
    /// 0 when unrated. Recomputed in the same statement that reads the
    /// rating set, never read-modify-written from application code.
    #[sea_orm(default_value = 0.0)]
    pub average_rating: f64,

    /// Number of ratings for this image (derived).
    #[sea_orm(default_value = 0)]
    pub total_ratings: i32,

    /// Set by moderation actions only.
    #[sea_orm(default_value = false)]
    pub is_flagged: bool,

    #[sea_orm(nullable)]
    pub flag_reason: Option<String>,

    /// Advisory verdict from the external AI-image detector.
    #[sea_orm(nullable)]
    pub ai_detected: Option<bool>,

    /// Detector confidence, 0-100.
    #[sea_orm(nullable)]
    pub ai_confidence: Option<i32>,

    #[sea_orm(nullable)]
    pub ai_detection_reason: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::streak::Entity")]
    Streaks,

    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::streak::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Streaks.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
