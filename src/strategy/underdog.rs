//! Underdog strategy (`underdog_v1`).
//!
//! Looks for cheap players relative to their output:
//! - point price (price per score point, weighted by recent attendance)
//!   must stay under a ceiling,
//! - the last recorded game must have been played,
//! - the most recent played game must score at least as well as the
//!   aggregate (non-negative progression).

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::Deserialize;
use tracing::debug;

use super::{to_fixed, Strategy, StrategyKind};
use crate::types::{Currency, Player, Recommendation, StrategyError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnderdogConfig {
    /// Point price must be strictly below this (EUR per point).
    pub max_point_price: f64,
    /// Minimum score progression ratio (0.0 = no regression allowed).
    pub min_progression_ratio: f64,
    /// Attach player identity and the strategy tag to recommendations.
    pub annotate: bool,
}

impl Default for UnderdogConfig {
    fn default() -> Self {
        Self {
            max_point_price: 0.4,
            min_progression_ratio: 0.0,
            annotate: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Figures the underdog rule is decided on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderdogMetrics {
    pub last_price: f64,
    pub played_ratio: f64,
    /// `price / score`, inflated by the share of missed games.
    pub point_price: f64,
    /// Most recent played game score over aggregate score, minus one.
    pub score_progression: f64,
    pub did_play_last_game: bool,
}

impl UnderdogMetrics {
    /// Compute the metrics for a player.
    ///
    /// Returns `None` when the player has no recorded games or a
    /// non-positive score; the rule never buys those.
    pub fn compute(player: &Player) -> Result<Option<Self>, StrategyError> {
        let price = player.last_price(Currency::Euro)?;
        let last_price = price.to_f64().ok_or_else(|| StrategyError::InvalidPrice {
            player: player.slug.clone(),
            value: price.to_string(),
        })?;
        let stats = player.stats()?;

        if stats.score <= 0 {
            return Ok(None);
        }
        let Some(played_ratio) = stats.played_games_ratio() else {
            return Ok(None);
        };

        let score = stats.score as f64;
        let base_point_price = last_price / score;
        let point_price = base_point_price + base_point_price * (1.0 - played_ratio);
        let score_progression = stats
            .played_games()
            .next()
            .map_or(0.0, |g| g.score as f64 / score - 1.0);

        Ok(Some(Self {
            last_price,
            played_ratio,
            point_price,
            score_progression,
            did_play_last_game: stats.did_play_last_game(),
        }))
    }

    pub fn comment(&self) -> String {
        format!(
            "price: {}€, point price: {}€, score progression: {}%",
            to_fixed(self.last_price, 2),
            to_fixed(self.point_price, 2),
            to_fixed(self.score_progression * 100.0, 2),
        )
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct Underdog {
    config: UnderdogConfig,
}

impl Underdog {
    pub fn new(config: UnderdogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UnderdogConfig {
        &self.config
    }

    fn is_buy(&self, m: &UnderdogMetrics) -> bool {
        m.did_play_last_game
            && m.point_price < self.config.max_point_price
            && m.score_progression >= self.config.min_progression_ratio
    }
}

impl Strategy for Underdog {
    fn name(&self) -> &'static str {
        StrategyKind::Underdog.name()
    }

    fn decide_at(
        &self,
        player: &Player,
        _today: NaiveDate,
    ) -> Result<Option<Recommendation>, StrategyError> {
        let Some(metrics) = UnderdogMetrics::compute(player)? else {
            debug!(player = %player.slug, "No games or non-positive score");
            return Ok(None);
        };

        if !self.is_buy(&metrics) {
            debug!(
                player = %player.slug,
                point_price = format!("{:.2}", metrics.point_price),
                progression = format!("{:.1}%", metrics.score_progression * 100.0),
                played_last = metrics.did_play_last_game,
                "Not an underdog"
            );
            return Ok(None);
        }

        debug!(
            player = %player.slug,
            point_price = format!("{:.2}", metrics.point_price),
            "Underdog found"
        );
        let recommendation = Recommendation::buy(metrics.comment());
        Ok(Some(if self.config.annotate {
            recommendation.with_identity(player, self.name())
        } else {
            recommendation
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
