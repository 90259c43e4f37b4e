//! Cross-venue prediction-market arbitrage scanner.
//!
//! The pipeline (see [`app`]) polls two prediction-market venues plus a
//! spot-price oracle, matches equivalent markets across venues, evaluates a
//! fixed set of no-arbitrage predicates over their orderbooks, mines
//! temporal-superset relationships between same-venue market titles, and
//! publishes every opportunity found to a CSV log, an optional SQLite
//! database, and a live SSE dashboard.

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod logical;
pub mod matcher;
pub mod scheduler;
pub mod sinks;
pub mod venue;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
