//! Reaction image catalog
//!
//! Each tier carries a fixed list of animated image URLs; one is chosen
//! uniformly at random for every result.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

/// Calm and neutral reactions
pub const LOW_TIER_ASSETS: &[&str] = &[
    "https://media3.giphy.com/media/l2JhIUyUs8KDCCf3W/giphy.gif",
    "https://media0.giphy.com/media/wJNGA01o1Zxp6/giphy.gif",
    "https://media.giphy.com/media/bXE0iECrH9xJe/giphy.gif",
];

pub const MEDIUM_TIER_ASSETS: &[&str] = &[
    "https://media2.giphy.com/media/6L015gMEW3pFC/giphy.gif",
    "https://media.giphy.com/media/HYQaj17e7yaoE/giphy.gif",
    "https://media.giphy.com/media/21PUvPL6jCKHtsMr5N/giphy.gif",
];

/// Energetic reactions
pub const HIGH_TIER_ASSETS: &[&str] = &[
    "https://media.giphy.com/media/xTg8B9aULho7shlPmU/giphy.gif",
    "https://media.giphy.com/media/26tn8u4JaBPQmq8mY/giphy.gif",
];

/// Candidate asset URLs per tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetCatalog {
    pub low: Vec<String>,
    pub medium: Vec<String>,
    pub high: Vec<String>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            low: to_owned(LOW_TIER_ASSETS),
            medium: to_owned(MEDIUM_TIER_ASSETS),
            high: to_owned(HIGH_TIER_ASSETS),
        }
    }
}

fn to_owned(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

impl AssetCatalog {
    pub fn candidates(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Low => &self.low,
            Tier::Medium => &self.medium,
            Tier::High => &self.high,
        }
    }

    /// Pick one candidate uniformly. `None` only if the tier is empty.
    pub fn choose<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> Option<&str> {
        self.candidates(tier).choose(rng).map(String::as_str)
    }

    /// First tier with no candidates, if any
    pub fn first_empty_tier(&self) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| self.candidates(*t).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_sizes() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.candidates(Tier::Low).len(), 3);
        assert_eq!(catalog.candidates(Tier::Medium).len(), 3);
        assert_eq!(catalog.candidates(Tier::High).len(), 2);
        assert!(catalog.first_empty_tier().is_none());
    }

    #[test]
    fn test_choose_returns_member_of_tier() {
        let catalog = AssetCatalog::default();
        let mut rng = StdRng::seed_from_u64(7);

        for tier in Tier::ALL {
            for _ in 0..50 {
                let asset = catalog.choose(tier, &mut rng).unwrap();
                assert!(catalog.candidates(tier).iter().any(|c| c == asset));
            }
        }
    }

    #[test]
    fn test_choose_reaches_every_candidate() {
        let catalog = AssetCatalog::default();
        let mut rng = StdRng::seed_from_u64(42);

        let seen: HashSet<&str> = (0..500)
            .filter_map(|_| catalog.choose(Tier::Low, &mut rng))
            .collect();
        assert_eq!(seen.len(), LOW_TIER_ASSETS.len());
    }

    #[test]
    fn test_empty_tier() {
        let catalog = AssetCatalog {
            medium: Vec::new(),
            ..AssetCatalog::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(catalog.first_empty_tier(), Some(Tier::Medium));
        assert!(catalog.choose(Tier::Medium, &mut rng).is_none());
    }
}
