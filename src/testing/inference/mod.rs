//! Exact tests on count data.

pub mod discrete;

pub use discrete::{ContingencyTable, fisher_exact_test, log_odds_ratio};
