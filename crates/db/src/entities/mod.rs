//! SeaORM entities.

pub mod admin_notification;
pub mod follow;
pub mod image;
pub mod profile;
pub mod rating;
pub mod report;
pub mod streak;
pub mod user;

pub use admin_notification::Entity as AdminNotification;
pub use follow::Entity as Follow;
pub use image::Entity as Image;
pub use profile::Entity as Profile;
pub use rating::Entity as Rating;
pub use report::Entity as Report;
pub use streak::Entity as Streak;
pub use user::Entity as User;
