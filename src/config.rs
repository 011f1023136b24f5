//! Server configuration from environment variables
//!
//! Reads:
//!   TARIFF_BIND_ADDR   - listen address (default: 0.0.0.0:3000)
//!   PORT               - overrides the port of TARIFF_BIND_ADDR
//!   TARIFF_SEED        - base seed for deterministic sessions
//!   TARIFF_POLICY      - regenerate | once-per-country
//!   TARIFF_CONFIG_PATH - YAML file with range, thresholds and assets
//!   TARIFF_STATIC_DIR  - extra static files served under /static
//!   TARIFF_SESSION_IDLE_SECS - idle time before a session is evicted (default: 1800)
//!   TARIFF_MAX_SESSIONS      - sessions kept at most (default: 10000)

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, TariffError};
use crate::generator::TariffConfig;
use crate::session::GenerationPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Bounds on the server's in-memory session store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Sessions not updated for longer than this are dropped
    pub idle_ttl: Duration,
    /// Upper bound on live sessions; the least recently updated go first
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub seed: Option<u64>,
    pub policy: GenerationPolicy,
    pub tariff: TariffConfig,
    pub static_dir: Option<PathBuf>,
    pub sessions: SessionLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            seed: None,
            policy: GenerationPolicy::default(),
            tariff: TariffConfig::default(),
            static_dir: None,
            sessions: SessionLimits::default(),
        }
    }
}

impl ServerConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ServerConfig::default();

        if let Some(addr) = get("TARIFF_BIND_ADDR") {
            config.bind_addr = addr.trim().to_string();
        }

        if let Some(port) = get("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| TariffError::Config(format!("invalid PORT: {}", port)))?;
            config.bind_addr = with_port(&config.bind_addr, port);
        }

        if let Some(seed) = get("TARIFF_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|_| TariffError::Config(format!("invalid TARIFF_SEED: {}", seed)))?;
            config.seed = Some(seed);
        }

        if let Some(policy) = get("TARIFF_POLICY") {
            config.policy = policy.parse()?;
        }

        if let Some(path) = get("TARIFF_CONFIG_PATH") {
            info!("Loading tariff config from {}", path);
            config.tariff = TariffConfig::load(path.trim())?;
        }

        config.static_dir = get("TARIFF_STATIC_DIR").map(PathBuf::from);

        if let Some(secs) = get("TARIFF_SESSION_IDLE_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                TariffError::Config(format!("invalid TARIFF_SESSION_IDLE_SECS: {}", secs))
            })?;
            config.sessions.idle_ttl = Duration::from_secs(secs);
        }

        if let Some(max) = get("TARIFF_MAX_SESSIONS") {
            let max = max
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| TariffError::Config(format!("invalid TARIFF_MAX_SESSIONS: {}", max)))?;
            config.sessions.max_sessions = max;
        }

        Ok(config)
    }
}

/// Replace (or append) the port of a `host:port` address
fn with_port(addr: &str, port: u16) -> String {
    let host = match addr.rsplit_once(':') {
        Some((host, _)) => host,
        None => addr,
    };
    format!("{}:{}", host, port)
}
