//! Tariff generation
//!
//! Draws a value uniformly from `[min, max]`, classifies it into a tier and
//! picks one of that tier's reaction images. Generators are only built from
//! a validated [`TariffConfig`], so a draw cannot fail.

use std::path::Path;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assets::AssetCatalog;
use crate::countries::Selection;
use crate::error::{Result, TariffError};
use crate::tier::{Tier, TierThresholds};

/// Smallest tariff that can be drawn
pub const DEFAULT_MIN_TARIFF: u32 = 10;

/// Largest tariff that can be drawn
pub const DEFAULT_MAX_TARIFF: u32 = 200;

/// Draw range, tier thresholds and per-tier assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub min: u32,
    pub max: u32,
    pub thresholds: TierThresholds,
    pub assets: AssetCatalog,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TARIFF,
            max: DEFAULT_MAX_TARIFF,
            thresholds: TierThresholds::default(),
            assets: AssetCatalog::default(),
        }
    }
}

impl TariffConfig {
    /// Check that the tiers partition `[min, max]` with no empty tier and
    /// that every tier has at least one asset.
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(TariffError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }

        let TierThresholds {
            low_max,
            medium_max,
        } = self.thresholds;
        let ordered = self.min <= low_max && low_max < medium_max && medium_max < self.max;
        if !ordered {
            return Err(TariffError::InvalidThresholds {
                min: self.min,
                max: self.max,
                low_max,
                medium_max,
            });
        }

        if let Some(tier) = self.assets.first_empty_tier() {
            return Err(TariffError::EmptyAssetTier(tier));
        }

        Ok(())
    }

    /// Parse and validate a YAML config. Missing fields take the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TariffConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    pub fn classify(&self, value: u32) -> Tier {
        self.thresholds.classify(value)
    }
}

/// One generated tariff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffResult {
    pub country: String,
    pub code: String,
    /// Percentage in `[min, max]`
    pub value: u32,
    pub tier: Tier,
    pub asset: String,
    pub generated_at: DateTime<Utc>,
}

impl std::fmt::Display for TariffResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}% ({})", self.country, self.value, self.tier)
    }
}

/// Random tariff source bound to a validated config
#[derive(Debug, Clone)]
pub struct TariffGenerator<R = StdRng> {
    config: TariffConfig,
    rng: R,
}

impl TariffGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn new(config: TariffConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic generator for replayable sessions and tests
    pub fn seeded(config: TariffConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TariffGenerator<R> {
    pub fn with_rng(config: TariffConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    /// Draw a value from `[min, max]` without choosing an asset
    pub fn draw_value(&mut self) -> u32 {
        self.rng.gen_range(self.config.min..=self.config.max)
    }

    /// Generate a tariff for the selected country
    pub fn draw(&mut self, selection: &Selection) -> TariffResult {
        let value = self.draw_value();
        let tier = self.config.classify(value);
        // Non-empty for every tier: checked in `with_rng`.
        let asset = self
            .config
            .assets
            .choose(tier, &mut self.rng)
            .map(str::to_string)
            .unwrap_or_default();

        debug!(country = selection.name(), value, %tier, "Generated tariff");

        TariffResult {
            country: selection.name().to_string(),
            code: selection.code().to_string(),
            value,
            tier,
            asset,
            generated_at: Utc::now(),
        }
    }
}
