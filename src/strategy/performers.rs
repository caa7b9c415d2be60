//! High-score strategy (`performers_v1`).
//!
//! Buys any player whose aggregate score clears a fixed bar, whatever the
//! price.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::{Strategy, StrategyKind};
use crate::types::{Currency, Player, Recommendation, StrategyError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerformersConfig {
    /// Scores strictly above this trigger a buy.
    pub min_score: i64,
}

impl Default for PerformersConfig {
    fn default() -> Self {
        Self { min_score: 35 }
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct Performers {
    config: PerformersConfig,
}

impl Performers {
    pub fn new(config: PerformersConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PerformersConfig {
        &self.config
    }
}

impl Strategy for Performers {
    fn name(&self) -> &'static str {
        StrategyKind::Performers.name()
    }

    fn decide_at(
        &self,
        player: &Player,
        _today: NaiveDate,
    ) -> Result<Option<Recommendation>, StrategyError> {
        let last_price = player.last_price(Currency::Euro)?;
        let score = player.stats()?.score;

        if score <= self.config.min_score {
            debug!(player = %player.slug, score, min_score = self.config.min_score, "Score below bar");
            return Ok(None);
        }

        debug!(player = %player.slug, score, price = %last_price, "High score");
        Ok(Some(Recommendation::buy(format!(
            "score: {score}, price: {}€",
            last_price.normalize()
        ))))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
