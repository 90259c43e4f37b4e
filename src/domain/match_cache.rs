//! The persistent venue-A → venue-B match mapping.
//!
//! The wire format (field names `matched` / `unmatched_poly` /
//! `unmatched_kalshi` / `last_full_scan`) is fixed by `spec.md` §6 and kept
//! bit-exact even though the in-memory types use venue-neutral names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::market::MarketId;

/// Which cascade tier (or re-match sweep) produced a match, kept for
/// diagnostics and logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMethod {
    TokenSortRatio(u8),
    TokenSetRatio(u8),
    PartialRatio(u8),
    Semantic(f64),
}

impl MatchMethod {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            MatchMethod::TokenSortRatio(s) => format!("token_sort_{s}"),
            MatchMethod::TokenSetRatio(s) => format!("token_set_{s}"),
            MatchMethod::PartialRatio(s) => format!("partial_{s}"),
            MatchMethod::Semantic(s) => format!("semantic_{s:.2}"),
        }
    }
}

/// A single accepted match: (venue-A id, venue-B id, method tag).
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub venue_a_id: MarketId,
    pub venue_b_id: MarketId,
    pub method: MatchMethod,
}

/// Persisted mapping from venue-A market ids to venue-B market ids, plus the
/// "known unmatched" sets that let the matcher skip repeated cascade runs.
///
/// Invariants upheld by every mutator: a venue-B id appears at most once as
/// a value (P3); `record_match` is idempotent (P4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCache {
    pub matched: HashMap<String, String>,
    #[serde(default)]
    pub unmatched_poly: HashSet<String>,
    #[serde(default)]
    pub unmatched_kalshi: HashSet<String>,
    #[serde(default)]
    pub last_full_scan: Option<DateTime<Utc>>,
}

impl Default for MatchCache {
    fn default() -> Self {
        Self {
            matched: HashMap::new(),
            unmatched_poly: HashSet::new(),
            unmatched_kalshi: HashSet::new(),
            last_full_scan: None,
        }
    }
}

impl MatchCache {
    /// `get_match` — O(1) lookup of a venue-A id's venue-B match.
    #[must_use]
    pub fn get_match(&self, venue_a_id: &MarketId) -> Option<MarketId> {
        self.matched
            .get(venue_a_id.as_str())
            .map(|id| MarketId::from(id.as_str()))
    }

    #[must_use]
    pub fn is_known_unmatched(&self, venue_a_id: &MarketId) -> bool {
        self.unmatched_poly.contains(venue_a_id.as_str())
    }

    /// Is this venue-B id already claimed by some venue-A match?
    #[must_use]
    pub fn is_value_taken(&self, venue_b_id: &MarketId) -> bool {
        self.matched.values().any(|v| v == venue_b_id.as_str())
    }

    /// Record a match. Idempotent: re-recording the same pair is a no-op.
    /// Refuses (returns `false`) a pair that would violate value-injectivity
    /// by assigning an already-claimed venue-B id to a different venue-A id.
    pub fn record_match(&mut self, venue_a_id: &MarketId, venue_b_id: &MarketId) -> bool {
        if let Some(existing) = self.matched.get(venue_a_id.as_str()) {
            return existing == venue_b_id.as_str();
        }
        if self.is_value_taken(venue_b_id) {
            return false;
        }
        self.matched
            .insert(venue_a_id.as_str().to_string(), venue_b_id.as_str().to_string());
        self.unmatched_poly.remove(venue_a_id.as_str());
        true
    }

    pub fn mark_unmatched(&mut self, venue_a_id: &MarketId) {
        if !self.matched.contains_key(venue_a_id.as_str()) {
            self.unmatched_poly.insert(venue_a_id.as_str().to_string());
        }
    }

    pub fn set_last_full_scan(&mut self, at: DateTime<Utc>) {
        self.last_full_scan = Some(at);
    }
}
