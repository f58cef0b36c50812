//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Uploaded-file storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// AI-detection function configuration.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Streak-tracking configuration.
    #[serde(default)]
    pub streak: StreakConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Uploaded-file storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Base directory for stored files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Base URL for serving files.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_path: default_storage_path(),
            base_url: default_storage_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// AI-detection function configuration.
///
/// The detector is an external classifier reached over HTTP. Detection is
/// best-effort: when `endpoint` is unset or the call fails, uploads proceed
/// without a verdict.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionConfig {
    /// Endpoint URL of the detection function.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_detection_timeout")]
    pub timeout_secs: u64,
}

/// Streak-tracking configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StreakConfig {
    /// Length of one ranking period in hours.
    ///
    /// Streaks count consecutive ranking periods in which an image appears
    /// in the top set for a granularity. Periods are fixed windows of this
    /// length measured from the Unix epoch, UTC.
    #[serde(default = "default_streak_period_hours")]
    pub period_hours: u32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            period_hours: default_streak_period_hours(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_storage_url() -> String {
    "/files".to_string()
}

const fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

const fn default_detection_timeout() -> u64 {
    20
}

const fn default_streak_period_hours() -> u32 {
    24
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SHUTTER_ENV`)
    /// 3. Environment variables with `SHUTTER_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SHUTTER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHUTTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SHUTTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
