//! Persistent cross-venue market matcher.
//!
//! Responsibility: maintain the mapping from venue-A market ids to venue-B
//! market ids that represent the same underlying question (spec.md §4.4),
//! applying the cache-discipline rules verbatim: a new id is first looked
//! up in the matched table; if absent, the cascade runs against every
//! venue-B title not already claimed as a value; a hit is persisted
//! immediately; a miss adds the id to the known-unmatched set.

mod cascade;
mod cache;

pub use cascade::{find_first_match, run_cascade, NullSemanticMatcher, SemanticMatcher};
pub use cache::{PersistedMatchCache, DEFAULT_REMATCH_INTERVAL_SECS};

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::domain::{Market, MarketId};
use crate::error::Result;

pub struct MarketMatcher {
    persisted: PersistedMatchCache,
    semantic: Box<dyn SemanticMatcher>,
}

impl MarketMatcher {
    pub fn new(cache_path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self {
            persisted: PersistedMatchCache::load(cache_path)?,
            semantic: Box::new(NullSemanticMatcher),
        })
    }

    pub fn with_semantic_matcher(mut self, semantic: Box<dyn SemanticMatcher>) -> Self {
        self.semantic = semantic;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &crate::domain::MatchCache {
        self.persisted.cache()
    }

    /// Looks up or attempts to establish a match for `venue_a_market`
    /// against the current venue-B universe. Venue-B ids already claimed by
    /// a different venue-A match are excluded from the candidate set.
    pub fn match_one(
        &mut self,
        venue_a_market: &Market,
        venue_b_titles: &HashMap<MarketId, String>,
    ) -> Result<Option<MarketId>> {
        let venue_a_id = venue_a_market.id();

        if let Some(existing) = self.persisted.cache().get_match(venue_a_id) {
            return Ok(Some(existing));
        }
        if self.persisted.cache().is_known_unmatched(venue_a_id) {
            return Ok(None);
        }

        let candidates: Vec<(&str, &str)> = venue_b_titles
            .iter()
            .filter(|(id, _)| !self.persisted.cache().is_value_taken(id))
            .map(|(id, title)| (id.as_str(), title.as_str()))
            .collect();

        let found = find_first_match(venue_a_market.title(), candidates.into_iter(), self.semantic.as_ref())
            .map(|(id, method)| (MarketId::from(id), method));

        match found {
            Some((venue_b_id, method)) => {
                self.persisted.cache_mut().record_match(venue_a_id, &venue_b_id);
                self.persisted.flush()?;
                info!(
                    venue_a_id = %venue_a_id,
                    venue_b_id = %venue_b_id,
                    method = %method.label(),
                    "matched market"
                );
                Ok(Some(venue_b_id))
            }
            None => {
                self.persisted.cache_mut().mark_unmatched(venue_a_id);
                self.persisted.flush()?;
                Ok(None)
            }
        }
    }

    /// Re-runs the cascade for every known-unmatched id against the current
    /// venue-B universe. Returns the count of new matches.
    pub fn rematch_unmatched(
        &mut self,
        venue_a_titles: &HashMap<MarketId, String>,
        venue_b_titles: &HashMap<MarketId, String>,
    ) -> Result<usize> {
        info!("re-matching unmatched markets");
        let unmatched_ids: Vec<MarketId> = self
            .persisted
            .cache()
            .unmatched_poly
            .iter()
            .map(|id| MarketId::from(id.as_str()))
            .collect();

        let mut new_matches = 0;
        for venue_a_id in unmatched_ids {
            let Some(title) = venue_a_titles.get(&venue_a_id) else {
                continue;
            };
            let candidates: Vec<(&str, &str)> = venue_b_titles
                .iter()
                .filter(|(id, _)| !self.persisted.cache().is_value_taken(id))
                .map(|(id, title)| (id.as_str(), title.as_str()))
                .collect();

            if let Some((venue_b_id, _method)) =
                find_first_match(title, candidates.into_iter(), self.semantic.as_ref())
                    .map(|(id, method)| (MarketId::from(id), method))
            {
                self.persisted.cache_mut().record_match(&venue_a_id, &venue_b_id);
                new_matches += 1;
            }
        }

        self.persisted.cache_mut().set_last_full_scan(Utc::now());
        self.persisted.flush()?;
        Ok(new_matches)
    }

    #[must_use]
    pub fn due_for_rematch_sweep(&self, interval_secs: i64) -> bool {
        self.persisted
            .due_for_rematch_sweep(Utc::now(), interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(pairs: &[(&str, &str)]) -> HashMap<MarketId, String> {
        pairs
            .iter()
            .map(|(id, title)| (MarketId::from(*id), title.to_string()))
            .collect()
    }

    fn sample_market(id: &str, title: &str) -> Market {
        Market::new(
            crate::domain::Venue::CommitReveal,
            id,
            title,
            None,
            2,
            None,
            None,
            None,
            None,
            true,
        )
    }

    #[test]
    fn matches_and_caches_on_first_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = MarketMatcher::new(dir.path().join("cache.json")).unwrap();
        let venue_b = titles(&[("T-1", "Will the Fed cut rates in March?")]);
        let market = sample_market("a1", "Will the Fed cut rates in March?");

        let result = matcher.match_one(&market, &venue_b).unwrap();
        assert_eq!(result, Some(MarketId::from("T-1")));
        assert_eq!(
            matcher.cache().get_match(&MarketId::from("a1")),
            Some(MarketId::from("T-1"))
        );
    }

    #[test]
    fn repeated_lookup_is_served_from_cache_without_rerunning_cascade() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = MarketMatcher::new(dir.path().join("cache.json")).unwrap();
        let venue_b = titles(&[("T-1", "Will the Fed cut rates in March?")]);
        let market = sample_market("a1", "Will the Fed cut rates in March?");

        matcher.match_one(&market, &venue_b).unwrap();
        let empty = HashMap::new();
        let second = matcher.match_one(&market, &empty).unwrap();
        assert_eq!(second, Some(MarketId::from("T-1")));
    }

    #[test]
    fn unmatchable_market_is_recorded_as_unmatched() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = MarketMatcher::new(dir.path().join("cache.json")).unwrap();
        let venue_b = titles(&[("T-9", "Will the Lakers win the title?")]);
        let market = sample_market("a2", "Will it rain in Seattle tomorrow?");

        let result = matcher.match_one(&market, &venue_b).unwrap();
        assert_eq!(result, None);
        assert!(matcher.cache().is_known_unmatched(&MarketId::from("a2")));
    }

    #[test]
    fn rematch_sweep_promotes_a_previously_unmatched_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut matcher = MarketMatcher::new(dir.path().join("cache.json")).unwrap();
        let venue_a_titles = titles(&[("a3", "Will the Fed cut rates in March?")]);

        matcher
            .match_one(&sample_market("a3", "Will the Fed cut rates in March?"), &HashMap::new())
            .unwrap();
        assert!(matcher.cache().is_known_unmatched(&MarketId::from("a3")));

        let venue_b_titles = titles(&[("T-1", "Will the Fed cut rates in March?")]);
        let new_matches = matcher
            .rematch_unmatched(&venue_a_titles, &venue_b_titles)
            .unwrap();
        assert_eq!(new_matches, 1);
        assert!(!matcher.cache().is_known_unmatched(&MarketId::from("a3")));
    }
}
