//! Repository layer.
//!
//! Thin data-access wrappers over the database connection.

pub mod admin_notification;
pub mod follow;
pub mod image;
pub mod profile;
pub mod rating;
pub mod report;
pub mod streak;
pub mod user;

pub use admin_notification::AdminNotificationRepository;
pub use follow::FollowRepository;
pub use image::ImageRepository;
pub use profile::ProfileRepository;
pub use rating::RatingRepository;
pub use report::ReportRepository;
pub use streak::StreakRepository;
pub use user::UserRepository;
