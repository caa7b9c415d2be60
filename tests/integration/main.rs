//! Integration tests for SCOUT.
//!
//! Exercise the public API end to end: market JSON in, attributed
//! decisions out.

mod rules;
