//! Error handling for the tariff calculator
//!
//! A single thiserror enum covers table lookups, config validation and
//! config loading. The core draw itself has no failure mode.

use thiserror::Error;

use crate::tier::Tier;

/// Main error type for the tariff calculator
#[derive(Error, Debug)]
pub enum TariffError {
    #[error("Unknown country: '{0}'")]
    UnknownCountry(String),

    #[error("Invalid country code '{0}': expected two ASCII letters")]
    InvalidCountryCode(String),

    #[error("Invalid tariff range: min {min} is greater than max {max}")]
    InvalidRange { min: u32, max: u32 },

    #[error(
        "Invalid tier thresholds: low_max {low_max} and medium_max {medium_max} \
         must satisfy {min} <= low_max < medium_max < {max}"
    )]
    InvalidThresholds {
        min: u32,
        max: u32,
        low_max: u32,
        medium_max: u32,
    },

    #[error("No candidate assets configured for the {0} tier")]
    EmptyAssetTier(Tier),

    #[error("Unknown tier '{0}'. Valid values: low, medium, high")]
    InvalidTier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, TariffError>;
