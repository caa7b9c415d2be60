//! Strategy engine: buy rules, the registry that names them, and the
//! runner that applies every registered rule to a player.

pub mod performers;
pub mod underdog;
pub mod young_players;

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::StrategiesConfig;
use crate::types::{Decision, Player, Recommendation, StrategyError};
use performers::Performers;
use underdog::Underdog;
use young_players::YoungPlayers;

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// A pure buy rule over a single player.
///
/// Implementors hold only immutable configuration, so one instance can be
/// shared across threads and called any number of times.
pub trait Strategy: Send + Sync {
    /// Registry name, e.g. `underdog_v1`.
    fn name(&self) -> &'static str;

    /// Evaluate the rule as of `today`. `Ok(None)` means hold.
    fn decide_at(
        &self,
        player: &Player,
        today: NaiveDate,
    ) -> Result<Option<Recommendation>, StrategyError>;

    /// Evaluate the rule as of today's UTC date.
    fn decide(&self, player: &Player) -> Result<Option<Recommendation>, StrategyError> {
        self.decide_at(player, Utc::now().date_naive())
    }
}

/// Fixed-point rendering with `digits` decimals, rounding half away from
/// zero on the exact binary value (`0.125` -> `0.13`, `1.005` -> `1.00`).
pub(crate) fn to_fixed(value: f64, digits: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(d) => format!(
            "{:.*}",
            digits as usize,
            d.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{value:.*}", digits as usize),
    }
}

// ---------------------------------------------------------------------------
// Strategy kinds
// ---------------------------------------------------------------------------

/// Built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// High aggregate score.
    Performers,
    /// Cheap point price with positive momentum.
    Underdog,
    /// Players under a calendar age.
    YoungPlayers,
}

impl StrategyKind {
    /// All built-in rules, in default registration order.
    pub const ALL: &'static [StrategyKind] = &[
        StrategyKind::Performers,
        StrategyKind::Underdog,
        StrategyKind::YoungPlayers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Performers => "performers_v1",
            StrategyKind::Underdog => "underdog_v1",
            StrategyKind::YoungPlayers => "young_players_v1",
        }
    }

    /// Instantiate the rule with its section of the configuration.
    pub fn build(&self, config: &StrategiesConfig) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Performers => Box::new(Performers::new(config.performers.clone())),
            StrategyKind::Underdog => Box::new(Underdog::new(config.underdog.clone())),
            StrategyKind::YoungPlayers => {
                Box::new(YoungPlayers::new(config.young_players.clone()))
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a rule name (case-insensitive), with or without version suffix.
impl std::str::FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "performers_v1" | "performers" | "high_score" => Ok(StrategyKind::Performers),
            "underdog_v1" | "underdog" => Ok(StrategyKind::Underdog),
            "young_players_v1" | "young_players" | "young" => Ok(StrategyKind::YoungPlayers),
            _ => Err(StrategyError::UnknownStrategy(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Named rules, kept in registration order.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for StrategyRegistry {
    /// Every built-in rule with default thresholds.
    fn default() -> Self {
        let config = StrategiesConfig::default();
        let mut registry = Self::new();
        for kind in StrategyKind::ALL {
            registry.register(kind.build(&config));
        }
        registry
    }
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Build the rules enabled in the configuration, in the listed order.
    pub fn from_config(config: &StrategiesConfig) -> Result<Self, StrategyError> {
        let mut registry = Self::new();
        for kind in config.enabled_kinds()? {
            registry.register(kind.build(config));
        }
        Ok(registry)
    }

    /// Add a rule. A rule with the same name is replaced in place.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        match self
            .strategies
            .iter_mut()
            .find(|s| s.name() == strategy.name())
        {
            Some(slot) => {
                warn!(strategy = strategy.name(), "Replacing registered strategy");
                *slot = strategy;
            }
            None => self.strategies.push(strategy),
        }
    }

    /// Look a rule up by registered name, or by any alias of a built-in.
    pub fn get(&self, name: &str) -> Result<&dyn Strategy, StrategyError> {
        if let Some(s) = self.strategies.iter().find(|s| s.name() == name) {
            return Ok(s.as_ref());
        }
        let kind: StrategyKind = name.parse()?;
        self.strategies
            .iter()
            .find(|s| s.name() == kind.name())
            .map(|s| s.as_ref())
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Strategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Applies every registered rule to a player and attributes the buys.
pub struct StrategyRunner {
    registry: StrategyRegistry,
}

impl StrategyRunner {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run all rules as of today's UTC date.
    pub fn run_all(&self, player: &Player) -> Result<Vec<Decision>, StrategyError> {
        self.run_all_at(player, Utc::now().date_naive())
    }

    /// Run all rules as of `today`.
    ///
    /// Players without prices or stats are skipped (empty result). The
    /// first rule error aborts the run.
    pub fn run_all_at(
        &self,
        player: &Player,
        today: NaiveDate,
    ) -> Result<Vec<Decision>, StrategyError> {
        if player.prices.is_empty() || player.stats.is_none() {
            debug!(player = %player.slug, "Missing prices or stats, skipping");
            return Ok(Vec::new());
        }

        debug!(player = %player.slug, strategies = self.registry.len(), "Running all strategies");

        let mut decisions = Vec::new();
        for strategy in self.registry.iter() {
            match strategy.decide_at(player, today) {
                Ok(Some(recommendation)) => {
                    let decision = recommendation.into_decision(player, strategy.name());
                    info!(
                        player = %decision.player_slug,
                        strategy = %decision.strategy,
                        comment = %decision.comment,
                        "Buy signal"
                    );
                    decisions.push(decision);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        player = %player.slug,
                        strategy = strategy.name(),
                        error = %e,
                        "Strategy failed"
                    );
                    return Err(e);
                }
            }
        }

        Ok(decisions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
