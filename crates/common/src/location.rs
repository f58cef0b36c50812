//! Geographic granularity levels for leaderboard scoping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AppError;

/// Geographic level at which leaderboard scoping and streak tracking operate.
///
/// Levels are nested continent > country > state > district > city, but
/// scoping filters on the single selected field only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Continent,
    Country,
    State,
    District,
    City,
}

impl Granularity {
    /// All granularity levels, broadest first.
    pub const ALL: [Self; 5] = [
        Self::Continent,
        Self::Country,
        Self::State,
        Self::District,
        Self::City,
    ];

    /// Stable string form, used as the streak `streak_type` discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continent => "continent",
            Self::Country => "country",
            Self::State => "state",
            Self::District => "district",
            Self::City => "city",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continent" => Ok(Self::Continent),
            "country" => Ok(Self::Country),
            "state" => Ok(Self::State),
            "district" => Ok(Self::District),
            "city" => Ok(Self::City),
            other => Err(AppError::Validation(format!(
                "Unknown granularity: {other}"
            ))),
        }
    }
}

/// Leaderboard result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum TopLimit {
    Ten,
    Hundred,
    Thousand,
}

impl TopLimit {
    /// The numeric limit.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        match self {
            Self::Ten => 10,
            Self::Hundred => 100,
            Self::Thousand => 1000,
        }
    }
}

impl Default for TopLimit {
    fn default() -> Self {
        Self::Ten
    }
}

impl TryFrom<u64> for TopLimit {
    type Error = AppError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Self::Ten),
            100 => Ok(Self::Hundred),
            1000 => Ok(Self::Thousand),
            other => Err(AppError::Validation(format!(
                "Top limit must be 10, 100, or 1000, got {other}"
            ))),
        }
    }
}

impl From<TopLimit> for u64 {
    fn from(limit: TopLimit) -> Self {
        limit.as_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_round_trip() {
        for g in Granularity::ALL {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
    }

    #[test]
    fn test_granularity_rejects_unknown() {
        assert!("planet".parse::<Granularity>().is_err());
        assert!("Continent".parse::<Granularity>().is_err()); // case-sensitive
    }

    #[test]
    fn test_top_limit_values() {
        assert_eq!(TopLimit::try_from(10).unwrap(), TopLimit::Ten);
        assert_eq!(TopLimit::try_from(1000).unwrap().as_u64(), 1000);
        assert!(TopLimit::try_from(50).is_err());
    }

    #[test]
    fn test_granularity_serde() {
        let g: Granularity = serde_json::from_str("\"city\"").unwrap();
        assert_eq!(g, Granularity::City);
        assert_eq!(serde_json::to_string(&Granularity::Continent).unwrap(), "\"continent\"");
    }
}
