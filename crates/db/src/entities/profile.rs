//! Profile entity (public identity, location, and derived statistics).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    /// Same value as `user.id`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(nullable)]
    pub age: Option<i32>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    // Location fields, broadest to narrowest. Scoping matches a single
    // field exactly; hierarchical consistency is not enforced.
    #[sea_orm(nullable)]
    pub continent: Option<String>,

    #[sea_orm(nullable)]
    pub country: Option<String>,

    #[sea_orm(nullable)]
    pub country_code: Option<String>,

    #[sea_orm(nullable)]
    pub state: Option<String>,

    #[sea_orm(nullable)]
    pub district: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    /// Whether the profile's images are visible to non-followers.
    #[sea_orm(default_value = false)]
    pub is_public: bool,

    /// Global standing badge, 1-3 (derived).
    #[sea_orm(nullable)]
    pub badge_rank: Option<i32>,

    /// Number of owned images (derived).
    #[sea_orm(default_value = 0)]
    pub total_images: i32,

    /// Followers count (derived).
    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    /// Following count (derived).
    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    /// Mean of all scores ever given to this user's images (derived).
    #[sea_orm(default_value = 0.0)]
    pub average_rating: f64,

    /// Sum of `total_ratings` over owned images (derived).
    #[sea_orm(default_value = 0)]
    pub total_ratings_received: i32,

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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The profile's value at a location granularity, if set.
    #[must_use]
    pub fn location_value(&self, granularity: shutter_common::Granularity) -> Option<&str> {
        use shutter_common::Granularity;
        let value = match granularity {
            Granularity::Continent => self.continent.as_deref(),
            Granularity::Country => self.country.as_deref(),
            Granularity::State => self.state.as_deref(),
            Granularity::District => self.district.as_deref(),
            Granularity::City => self.city.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}
