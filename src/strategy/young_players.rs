//! Young players strategy (`young_players_v1`).
//!
//! Age is a plain calendar-year difference (current year minus birth
//! year), so a player can read one year older than they are until their
//! birthday. Use `Player::age_on` for the exact age.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use super::{Strategy, StrategyKind};
use crate::types::{Player, Recommendation, StrategyError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct YoungPlayersConfig {
    /// Calendar ages strictly below this trigger a buy.
    pub max_age: i32,
}

impl Default for YoungPlayersConfig {
    fn default() -> Self {
        Self { max_age: 25 }
    }
}

pub struct YoungPlayers {
    config: YoungPlayersConfig,
}

impl YoungPlayers {
    pub fn new(config: YoungPlayersConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YoungPlayersConfig {
        &self.config
    }
}

impl Strategy for YoungPlayers {
    fn name(&self) -> &'static str {
        StrategyKind::YoungPlayers.name()
    }

    fn decide_at(
        &self,
        player: &Player,
        today: NaiveDate,
    ) -> Result<Option<Recommendation>, StrategyError> {
        let age = today.year() - player.birth_year()?;

        if age >= self.config.max_age {
            debug!(player = %player.slug, age, "Too old");
            return Ok(None);
        }

        let score = player.stats()?.score;
        debug!(player = %player.slug, age, score, "Young player");
        Ok(Some(Recommendation::buy(format!("age: {age}, score: {score}"))))
    }
}
