//! Business logic services.

pub mod account;
pub mod badge;
pub mod detection;
pub mod follow;
pub mod image;
pub mod leaderboard;
pub mod profile;
pub mod rating;
pub mod report;
pub mod streak;

pub use account::AccountService;
pub use badge::BadgeService;
pub use detection::{DetectionResult, DetectionService};
pub use follow::FollowService;
pub use image::ImageService;
pub use leaderboard::{LeaderboardEntry, LeaderboardService, Scope};
pub use profile::ProfileService;
pub use rating::RatingService;
pub use report::ReportService;
pub use streak::StreakService;
