//! Per-user tariff session
//!
//! Owns the selection, the current result and the generator that produces
//! it. Two observable states:
//!
//! ```text
//!   NoResult ──generate (selection present)──▶ ResultPresent
//!      ▲                                          │   │
//!      └──────── selection changed / reset ───────┘   │
//!                                                     └─generate─▶ ResultPresent (new)
//! ```
//!
//! Generating without a selection is a no-op.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::countries::Selection;
use crate::error::{Result, TariffError};
use crate::generator::{TariffGenerator, TariffResult};

/// What a repeated generate for the same country does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationPolicy {
    /// Every generate replaces the result
    #[default]
    Regenerate,
    /// A country gets one tariff per session; later generates keep it
    OncePerCountry,
}

impl FromStr for GenerationPolicy {
    type Err = TariffError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "regenerate" => Ok(GenerationPolicy::Regenerate),
            "once-per-country" | "once" => Ok(GenerationPolicy::OncePerCountry),
            other => Err(TariffError::Config(format!(
                "Unknown generation policy '{}'. Valid values: regenerate, once-per-country",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NoResult,
    ResultPresent,
}

pub struct TariffSession<R = StdRng> {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    policy: GenerationPolicy,
    generator: TariffGenerator<R>,
    selection: Option<Selection>,
    result: Option<TariffResult>,
    /// Countries already drawn, consulted under `OncePerCountry`
    drawn: HashSet<&'static str>,
}

impl<R: Rng> TariffSession<R> {
    pub fn new(generator: TariffGenerator<R>, policy: GenerationPolicy) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            policy,
            generator,
            selection: None,
            result: None,
            drawn: HashSet::new(),
        }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn result(&self) -> Option<&TariffResult> {
        self.result.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match self.result {
            Some(_) => SessionState::ResultPresent,
            None => SessionState::NoResult,
        }
    }

    /// Whether a generate request would produce a new result
    pub fn can_generate(&self) -> bool {
        match (&self.selection, self.policy) {
            (None, _) => false,
            (Some(_), GenerationPolicy::Regenerate) => true,
            (Some(s), GenerationPolicy::OncePerCountry) => !self.drawn.contains(s.code()),
        }
    }

    /// Select a country by name or code.
    ///
    /// A different country clears the current result; re-selecting the same
    /// one leaves it in place.
    pub fn select(&mut self, label: &str) -> Result<&Selection> {
        let selection = Selection::parse(label)?;
        Ok(self.set_selection(selection))
    }

    pub fn set_selection(&mut self, selection: Selection) -> &Selection {
        if self.selection != Some(selection) {
            debug!(session_id = %self.id, country = selection.name(), "Selection changed");
            self.reset();
        }
        self.touch();
        self.selection.insert(selection)
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            debug!(session_id = %self.id, "Selection cleared");
        }
        self.reset();
        self.touch();
    }

    /// Generate a tariff for the current selection.
    ///
    /// No selection (or a country already drawn under `OncePerCountry`)
    /// makes this a no-op; whatever result exists is returned unchanged.
    pub fn generate(&mut self) -> Option<&TariffResult> {
        let Some(selection) = self.selection else {
            debug!(session_id = %self.id, "Generate ignored: no selection");
            return None;
        };

        if !self.can_generate() {
            debug!(
                session_id = %self.id,
                country = selection.name(),
                "Generate ignored: country already has a tariff"
            );
            return self.result.as_ref();
        }

        let result = self.generator.draw(&selection);
        info!(
            session_id = %self.id,
            country = %result.country,
            value = result.value,
            tier = %result.tier,
            "Tariff generated"
        );

        self.drawn.insert(selection.code());
        self.touch();
        Some(&*self.result.insert(result))
    }

    /// Drop the current result
    pub fn reset(&mut self) {
        self.result = None;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
