//! Shared server state: the session store and how new sessions are seeded

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::{ServerConfig, SessionLimits};
use crate::error::Result;
use crate::generator::{TariffConfig, TariffGenerator};
use crate::session::{GenerationPolicy, TariffSession};

/// Session store - maps session ID to its tariff session
pub type SessionStore = Arc<RwLock<HashMap<Uuid, TariffSession>>>;

/// Create a new session store
pub fn create_session_store() -> SessionStore {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Make room for one more session.
///
/// Drops every session idle for longer than `limits.idle_ttl`, then the
/// least recently updated ones until fewer than `limits.max_sessions`
/// remain. Returns how many were removed.
pub fn evict_sessions(
    sessions: &mut HashMap<Uuid, TariffSession>,
    limits: &SessionLimits,
    now: DateTime<Utc>,
) -> usize {
    let before = sessions.len();

    sessions.retain(|_, session| match (now - session.updated_at).to_std() {
        Ok(idle) => idle <= limits.idle_ttl,
        // Updated after `now`: not idle
        Err(_) => true,
    });

    while !sessions.is_empty() && sessions.len() >= limits.max_sessions {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, session)| session.updated_at)
            .map(|(id, _)| *id);
        match oldest {
            Some(id) => {
                sessions.remove(&id);
            }
            None => break,
        }
    }

    before - sessions.len()
}

/// Builds sessions from the server's tariff config.
///
/// With a base seed, the n-th session is seeded with `base + n` so a whole
/// run can be replayed.
#[derive(Debug)]
pub struct SessionFactory {
    config: TariffConfig,
    policy: GenerationPolicy,
    seed: Option<u64>,
    created: AtomicU64,
}

impl SessionFactory {
    pub fn new(config: TariffConfig, policy: GenerationPolicy, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy,
            seed,
            created: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &TariffConfig {
        &self.config
    }

    pub fn create(&self) -> Result<TariffSession> {
        let n = self.created.fetch_add(1, Ordering::Relaxed);
        let generator = match self.seed {
            Some(base) => TariffGenerator::seeded(self.config.clone(), base.wrapping_add(n))?,
            None => TariffGenerator::new(self.config.clone())?,
        };
        Ok(TariffSession::new(generator, self.policy))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub factory: Arc<SessionFactory>,
    pub limits: SessionLimits,
}

impl AppState {
    pub fn new(factory: SessionFactory) -> Self {
        Self {
            sessions: create_session_store(),
            factory: Arc::new(factory),
            limits: SessionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let factory = SessionFactory::new(config.tariff.clone(), config.policy, config.seed)?;
        Ok(Self::new(factory).with_limits(config.sessions))
    }

    /// Store a new session, evicting idle or surplus ones first
    pub async fn insert_session(&self, session: TariffSession) {
        let mut sessions = self.sessions.write().await;
        let evicted = evict_sessions(&mut sessions, &self.limits, Utc::now());
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Evicted sessions");
        }
        sessions.insert(session.id, session);
    }
}
