//! Tariff calculator
//!
//! Pick a country of origin, press Generate, get a random tariff between
//! 10% and 200% plus a reaction image matching how bad it is.
//!
//! - [`countries`] - the dropdown table and flag emoji
//! - [`tier`] - low / medium / high classification
//! - [`assets`] - reaction images per tier
//! - [`generator`] - validated config and the random draw
//! - [`session`] - selection/result state machine
//! - [`config`] - environment configuration for the server
//! - `api` - axum router (feature `server`)

pub mod assets;
pub mod config;
pub mod countries;
pub mod error;
pub mod generator;
pub mod session;
pub mod tier;

#[cfg(feature = "server")]
pub mod api;

pub use countries::{Country, Selection, COUNTRIES};
pub use error::{Result, TariffError};
pub use generator::{TariffConfig, TariffGenerator, TariffResult};
pub use session::{GenerationPolicy, SessionState, TariffSession};
pub use tier::{Tier, TierThresholds};
