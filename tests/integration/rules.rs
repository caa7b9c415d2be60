//! Rule behaviour over realistic players, through the public API only.

use chrono::{Datelike, NaiveDate};
use scout::strategy::performers::{Performers, PerformersConfig};
use scout::strategy::underdog::{Underdog, UnderdogConfig, UnderdogMetrics};
use scout::strategy::young_players::{YoungPlayers, YoungPlayersConfig};
use scout::strategy::Strategy;
use scout::types::{Action, Game, Player, StrategyError};

use crate::fixtures::{self, reference_date};

fn with_score(mut player: Player, score: i64) -> Player {
    player.stats.as_mut().unwrap().score = score;
    player
}

#[test]
fn test_performers_on_fixtures() {
    let rule = Performers::new(PerformersConfig::default());
    let today = reference_date();

    let rec = rule
        .decide_at(&fixtures::player(fixtures::PRODIGY), today)
        .unwrap()
        .unwrap();
    assert_eq!(rec.action, Action::Buy);
    assert_eq!(rec.comment, "score: 62, price: 20€");

    let rec = rule
        .decide_at(&fixtures::player(fixtures::VETERAN), today)
        .unwrap()
        .unwrap();
    assert_eq!(rec.comment, "score: 41, price: 48€");

    assert_eq!(
        rule.decide_at(&fixtures::player(fixtures::BENCHWARMER), today).unwrap(),
        None
    );
}

#[test]
fn test_performers_score_sweep() {
    let rule = Performers::new(PerformersConfig::default());
    let base = fixtures::player(fixtures::BENCHWARMER);

    for score in -5..=100 {
        let result = rule.decide(&with_score(base.clone(), score)).unwrap();
        if score > 35 {
            let rec = result.expect("scores above 35 buy");
            assert_eq!(rec.comment, format!("score: {score}, price: 3.1€"));
        } else {
            assert!(result.is_none(), "score {score} should hold");
        }
    }
}

#[test]
fn test_underdog_on_fixtures() {
    let rule = Underdog::new(UnderdogConfig::default());
    let today = reference_date();

    let rec = rule
        .decide_at(&fixtures::player(fixtures::PRODIGY), today)
        .unwrap()
        .unwrap();
    assert_eq!(
        rec.comment,
        "price: 20.00€, point price: 0.32€, score progression: 25.81%"
    );

    for json in [fixtures::VETERAN, fixtures::BENCHWARMER] {
        assert_eq!(rule.decide_at(&fixtures::player(json), today).unwrap(), None);
    }
}

#[test]
fn test_underdog_single_condition_flips() {
    let rule = Underdog::new(UnderdogConfig::default());
    let base = fixtures::player(fixtures::PRODIGY);
    assert!(rule.decide(&base).unwrap().is_some());

    // Last game missed; price lowered so the point price still passes
    let mut missed = base.clone();
    missed.prices[0].eur = "10.00".to_string();
    missed.stats.as_mut().unwrap().games.insert(
        0,
        Game {
            date: "2026-10-17".to_string(),
            did_play: false,
            score: 0,
        },
    );
    let metrics = UnderdogMetrics::compute(&missed).unwrap().unwrap();
    assert!(metrics.point_price < 0.4);
    assert!(metrics.score_progression >= 0.0);
    assert!(!metrics.did_play_last_game);
    assert_eq!(rule.decide(&missed).unwrap(), None);

    // Point price above the ceiling: 31 / 62 = 0.5
    let mut expensive = base.clone();
    expensive.prices[0].eur = "31.00".to_string();
    assert_eq!(rule.decide(&expensive).unwrap(), None);

    // Latest played game below the aggregate score
    let mut slumping = base.clone();
    slumping.stats.as_mut().unwrap().games[0].score = 40;
    assert_eq!(rule.decide(&slumping).unwrap(), None);

    // Zero aggregate score
    let zero = with_score(base, 0);
    assert_eq!(rule.decide(&zero).unwrap(), None);
}

#[test]
fn test_young_players_on_fixtures() {
    let rule = YoungPlayers::new(YoungPlayersConfig::default());
    let today = reference_date();

    let rec = rule
        .decide_at(&fixtures::player(fixtures::PRODIGY), today)
        .unwrap()
        .unwrap();
    assert_eq!(rec.comment, "age: 19, score: 62");

    assert_eq!(
        rule.decide_at(&fixtures::player(fixtures::VETERAN), today).unwrap(),
        None
    );
    assert_eq!(
        rule.decide_at(&fixtures::player(fixtures::UNLISTED), today),
        Err(StrategyError::MissingStats {
            player: "new-signing".to_string()
        })
    );
}

#[test]
fn test_young_players_age_sweep() {
    let rule = YoungPlayers::new(YoungPlayersConfig::default());
    let today = reference_date();
    let mut player = fixtures::player(fixtures::VETERAN);

    for age in 15..35 {
        let birth = NaiveDate::from_ymd_opt(today.year() - age, 6, 15).unwrap();
        player.birth_date = birth.format("%Y-%m-%d").to_string();
        let result = rule.decide_at(&player, today).unwrap();
        if age < 25 {
            assert_eq!(result.unwrap().comment, format!("age: {age}, score: 41"));
        } else {
            assert!(result.is_none(), "age {age} should hold");
        }
    }
}

#[test]
fn test_price_dependent_rules_reject_unlisted_players() {
    let unlisted = fixtures::player(fixtures::UNLISTED);
    assert!(matches!(
        Performers::new(PerformersConfig::default()).decide(&unlisted),
        Err(StrategyError::MissingPrice { .. })
    ));
    assert!(matches!(
        Underdog::new(UnderdogConfig::default()).decide(&unlisted),
        Err(StrategyError::MissingPrice { .. })
    ));
}

#[test]
fn test_rules_do_not_mutate_input() {
    let player = fixtures::player(fixtures::PRODIGY);
    let before = player.clone();
    let today = reference_date();

    let rules: Vec<Box<dyn Strategy>> = vec![
        Box::new(Performers::new(PerformersConfig::default())),
        Box::new(Underdog::new(UnderdogConfig::default())),
        Box::new(YoungPlayers::new(YoungPlayersConfig::default())),
    ];
    for rule in &rules {
        let first = rule.decide_at(&player, today).unwrap();
        let second = rule.decide_at(&player, today).unwrap();
        assert_eq!(first, second, "{} is not deterministic", rule.name());
    }
    assert_eq!(player, before);
}
