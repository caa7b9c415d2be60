//! Shared types for SCOUT.
//!
//! Player market data flows in, recommendations and decisions flow out.
//! Strategy modules depend on these types only, never on each other.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Currency & prices
// ---------------------------------------------------------------------------

/// Currency a market price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Euro,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Euro => "€",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Euro => write!(f, "EUR"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// A single sale of a player card. Amounts are kept as the decimal strings
/// the market returns and parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub date: String,
    pub eur: String,
    #[serde(default)]
    pub usd: String,
}

impl Price {
    /// The raw amount string for a currency.
    pub fn raw(&self, currency: Currency) -> &str {
        match currency {
            Currency::Euro => &self.eur,
            Currency::Usd => &self.usd,
        }
    }

    /// Parse the amount for a currency. `None` if it is not a decimal.
    pub fn amount(&self, currency: Currency) -> Option<Decimal> {
        let raw = self.raw(currency).trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// One recorded game, most recent first in `Stats::games`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub date: String,
    pub did_play: bool,
    pub score: u64,
}

/// Aggregate performance statistics of a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub player_slug: String,
    /// Aggregate score. May be zero (or negative for penalised players).
    pub score: i64,
    /// Recent games, most recent first.
    #[serde(default)]
    pub games: Vec<Game>,
}

impl Stats {
    /// Games the player actually took part in, most recent first.
    pub fn played_games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(|g| g.did_play)
    }

    pub fn last_game_scores(&self) -> Option<Vec<u64>> {
        if self.games.is_empty() {
            None
        } else {
            Some(self.games.iter().map(|g| g.score).collect())
        }
    }

    pub fn played_games_count(&self) -> Option<usize> {
        if self.games.is_empty() {
            None
        } else {
            Some(self.played_games().count())
        }
    }

    /// Fraction of recorded games actually played. `None` without games.
    pub fn played_games_ratio(&self) -> Option<f64> {
        let played = self.played_games_count()?;
        Some(played as f64 / self.games.len() as f64)
    }

    /// Whether the most recent recorded game was played (false if none).
    pub fn did_play_last_game(&self) -> bool {
        self.games.first().is_some_and(|g| g.did_play)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player as seen by the strategies: identity, price history and stats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub slug: String,
    pub display_name: String,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date.
    pub birth_date: String,
    #[serde(default)]
    pub team: Option<String>,
    /// Sales, most recent first.
    #[serde(default)]
    pub prices: Vec<Price>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.slug)?;
        if let Some(team) = &self.team {
            write!(f, " [{team}]")?;
        }
        Ok(())
    }
}

impl Player {
    /// Stats, or `MissingStats` for rules that need a score.
    pub fn stats(&self) -> Result<&Stats, StrategyError> {
        self.stats.as_ref().ok_or_else(|| StrategyError::MissingStats {
            player: self.slug.clone(),
        })
    }

    /// Most recent sale price in the given currency.
    pub fn last_price(&self, currency: Currency) -> Result<Decimal, StrategyError> {
        let price = self.prices.first().ok_or_else(|| StrategyError::MissingPrice {
            player: self.slug.clone(),
        })?;
        price
            .amount(currency)
            .ok_or_else(|| StrategyError::InvalidPrice {
                player: self.slug.clone(),
                value: price.raw(currency).to_string(),
            })
    }

    /// Relative change between the oldest and the most recent price.
    pub fn price_delta_ratio(&self, currency: Currency) -> Option<f64> {
        let last = self.prices.first()?.amount(currency)?;
        let old = self.prices.last()?.amount(currency)?;
        if old.is_zero() {
            return None;
        }
        ((last - old) / old).to_f64()
    }

    /// Mean of the `max_count` most recent prices.
    pub fn price_avg(&self, currency: Currency, max_count: usize) -> Option<f64> {
        let amounts = self
            .prices
            .iter()
            .take(max_count)
            .map(|p| p.amount(currency))
            .collect::<Option<Vec<Decimal>>>()?;
        if amounts.is_empty() {
            return None;
        }
        let total: Decimal = amounts.iter().sum();
        (total / Decimal::from(amounts.len())).to_f64()
    }

    pub fn birth_date(&self) -> Result<NaiveDate, StrategyError> {
        parse_birth_date(&self.birth_date).ok_or_else(|| StrategyError::InvalidBirthDate {
            player: self.slug.clone(),
            value: self.birth_date.clone(),
        })
    }

    pub fn birth_year(&self) -> Result<i32, StrategyError> {
        Ok(self.birth_date()?.year())
    }

    /// Exact age in whole years on `today` (month and day aware).
    pub fn age_on(&self, today: NaiveDate) -> Result<u32, StrategyError> {
        Ok(today.years_since(self.birth_date()?).unwrap_or(0))
    }

    /// Helper to build a test/sample player with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        Player {
            slug: "kylian-mbappe-lottin".to_string(),
            display_name: "Kylian Mbappé".to_string(),
            birth_date: "1998-12-20T00:00:00Z".to_string(),
            team: Some("Real Madrid".to_string()),
            prices: vec![
                Price {
                    date: "2023-07-22T16:15:13Z".to_string(),
                    eur: "40".to_string(),
                    usd: "50".to_string(),
                },
                Price {
                    date: "2023-07-22T15:15:13Z".to_string(),
                    eur: "60".to_string(),
                    usd: "70".to_string(),
                },
            ],
            stats: Some(Stats {
                player_slug: "kylian-mbappe-lottin".to_string(),
                score: 60,
                games: vec![
                    Game { date: "2023-07-20".to_string(), did_play: true, score: 72 },
                    Game { date: "2023-07-13".to_string(), did_play: false, score: 0 },
                    Game { date: "2023-07-06".to_string(), did_play: true, score: 55 },
                ],
            }),
        }
    }
}

fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

// ---------------------------------------------------------------------------
// Recommendations & decisions
// ---------------------------------------------------------------------------

/// The only signal a strategy ever emits. Holding is expressed by
/// returning no recommendation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "Buy"),
        }
    }
}

/// Output of a single strategy evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    /// Rationale including the computed metrics.
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action, self.comment)
    }
}

impl Recommendation {
    pub fn buy(comment: impl Into<String>) -> Self {
        Self {
            action: Action::Buy,
            comment: comment.into(),
            player_slug: None,
            player_name: None,
            strategy: None,
        }
    }

    /// Attach the player's identity and the strategy tag.
    pub fn with_identity(mut self, player: &Player, strategy: &str) -> Self {
        self.player_slug = Some(player.slug.clone());
        self.player_name = Some(player.display_name.clone());
        self.strategy = Some(strategy.to_string());
        self
    }

    /// Attribute this recommendation. Identity already attached by the
    /// strategy wins over the fallbacks.
    pub fn into_decision(self, player: &Player, strategy: &str) -> Decision {
        Decision {
            action: self.action,
            player_slug: self.player_slug.unwrap_or_else(|| player.slug.clone()),
            player_name: self.player_name.unwrap_or_else(|| player.display_name.clone()),
            strategy: self.strategy.unwrap_or_else(|| strategy.to_string()),
            comment: self.comment,
        }
    }
}

/// A recommendation attributed to a player and the strategy that made it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub player_slug: String,
    pub player_name: String,
    pub strategy: String,
    pub comment: String,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.action, self.player_name, self.strategy, self.comment,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Ways a strategy evaluation can fail on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("Player {player} has no price")]
    MissingPrice { player: String },

    #[error("Player {player} has a non-numeric price: {value:?}")]
    InvalidPrice { player: String, value: String },

    #[error("Player {player} has no stats")]
    MissingStats { player: String },

    #[error("Player {player} has an invalid birth date: {value:?}")]
    InvalidBirthDate { player: String, value: String },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
