//! Streak entity (consecutive top-N appearances per image and granularity).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "streak")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub image_id: String,

    /// Granularity discriminator ("continent" .. "city").
    /// One streak row per (image, granularity).
    pub streak_type: String,

    /// The scope string the streak was computed against, or "*" for an
    /// unscoped ranking. The owner's location is fixed but the streak is
    /// specific to the granularity being viewed.
    pub location_value: String,

    /// Consecutive ranking periods in the top set. 0 after falling out.
    #[sea_orm(default_value = 0)]
    pub current_streak: i32,

    /// High-water mark of `current_streak`.
    #[sea_orm(default_value = 0)]
    pub longest_streak: i32,

    /// Last time the image was seen in the top set for this granularity.
    #[sea_orm(nullable)]
    pub last_in_top_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Image,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
