//! Common utilities and shared types for shutter.
//!
//! This crate provides foundational components used across all shutter crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Location**: Geographic [`Granularity`] levels and leaderboard [`TopLimit`]
//! - **Storage**: File storage backends for uploaded photos
//!
//! # Example
//!
//! ```no_run
//! use shutter_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod location;
pub mod storage;

pub use config::{Config, DetectionConfig, StorageSettings, StreakConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use location::{Granularity, TopLimit};
pub use storage::{LocalStorage, StorageBackend, UploadedFile, generate_storage_key};
