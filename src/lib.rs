//! SCOUT: buy-signal strategies over player market data.
//!
//! Library crate exposing the data model, the strategies and their
//! registry, configuration loading, and logging setup.

pub mod config;
pub mod logging;
pub mod strategy;
pub mod types;
