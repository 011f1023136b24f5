//! Severity tiers
//!
//! A tariff value maps to exactly one tier through two inclusive upper
//! thresholds. Classification is pure; the only randomness in a draw lives
//! in the value itself and in the asset picked for its tier.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::TariffError;
use crate::generator::TariffConfig;

/// Upper bound (inclusive) of the low tier
pub const DEFAULT_LOW_MAX: u32 = 50;

/// Upper bound (inclusive) of the medium tier
pub const DEFAULT_MEDIUM_MAX: u32 = 100;

/// Tariff severity, ordered low to high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// All tiers in ascending order
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }

    /// Inclusive sub-range of `[config.min, config.max]` covered by this tier.
    ///
    /// Only partitions the interval for a validated config; otherwise the
    /// range may be empty, but it never overflows.
    pub fn range(self, config: &TariffConfig) -> RangeInclusive<u32> {
        let t = &config.thresholds;
        match self {
            Tier::Low => config.min..=t.low_max,
            Tier::Medium => t.low_max.saturating_add(1)..=t.medium_max,
            Tier::High => t.medium_max.saturating_add(1)..=config.max,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Tier::Low),
            "medium" => Ok(Tier::Medium),
            "high" => Ok(Tier::High),
            other => Err(TariffError::InvalidTier(other.to_string())),
        }
    }
}

/// The two cut points separating low/medium and medium/high
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Values `<= low_max` are low
    pub low_max: u32,
    /// Values in `(low_max, medium_max]` are medium; anything above is high
    pub medium_max: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            low_max: DEFAULT_LOW_MAX,
            medium_max: DEFAULT_MEDIUM_MAX,
        }
    }
}

impl TierThresholds {
    pub fn new(low_max: u32, medium_max: u32) -> Self {
        Self {
            low_max,
            medium_max,
        }
    }

    /// Classify a tariff value. Thresholds are inclusive on their upper bound.
    pub fn classify(&self, value: u32) -> Tier {
        if value <= self.low_max {
            Tier::Low
        } else if value <= self.medium_max {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}
