//! The multi-tier fuzzy matching cascade.
//!
//! Grounded on `original_source/market_matcher.py`'s `_fuzzy_match`: three
//! string-similarity tiers run in a fixed order and the first tier to clear
//! its threshold wins — there is no best-of-all-candidates scoring, per
//! `SPEC_FULL.md` §7. A fourth, optional semantic tier sits behind
//! [`SemanticMatcher`] so the cascade can run without an embedding model.

use rapidfuzz::fuzz;

use crate::domain::MatchMethod;

const TOKEN_SORT_THRESHOLD: f64 = 70.0;
const TOKEN_SET_THRESHOLD: f64 = 70.0;
const PARTIAL_THRESHOLD: f64 = 75.0;
const SEMANTIC_THRESHOLD: f64 = 0.85;

/// Pluggable tier 4. Real deployments may wire in an embedding model; the
/// default is a no-op so the cascade degrades gracefully without one.
pub trait SemanticMatcher: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Option<f64>;
}

/// Always reports "no similarity available" — the cascade falls through to
/// "no match" when no real semantic matcher is configured.
pub struct NullSemanticMatcher;

impl SemanticMatcher for NullSemanticMatcher {
    fn similarity(&self, _a: &str, _b: &str) -> Option<f64> {
        None
    }
}

/// Runs the cascade for one `(candidate_a, candidate_b)` title pair.
/// Returns the accepting tier, or `None` if nothing cleared its threshold.
pub fn run_cascade(
    title_a: &str,
    title_b: &str,
    semantic: &dyn SemanticMatcher,
) -> Option<MatchMethod> {
    let a = title_a.to_lowercase();
    let b = title_b.to_lowercase();

    let score = fuzz::token_sort_ratio(a.chars(), b.chars());
    if score >= TOKEN_SORT_THRESHOLD {
        return Some(MatchMethod::TokenSortRatio(score.round() as u8));
    }

    let score = fuzz::token_set_ratio(a.chars(), b.chars());
    if score >= TOKEN_SET_THRESHOLD {
        return Some(MatchMethod::TokenSetRatio(score.round() as u8));
    }

    let score = fuzz::partial_ratio(a.chars(), b.chars());
    if score >= PARTIAL_THRESHOLD {
        return Some(MatchMethod::PartialRatio(score.round() as u8));
    }

    if let Some(similarity) = semantic.similarity(&a, &b) {
        if similarity >= SEMANTIC_THRESHOLD {
            return Some(MatchMethod::Semantic(similarity));
        }
    }

    None
}

/// Scans `candidates` in iteration order and accepts the first one the
/// cascade clears — "first accept wins", never best-of-all.
pub fn find_first_match<'a>(
    title_a: &str,
    candidates: impl Iterator<Item = (&'a str, &'a str)>,
    semantic: &dyn SemanticMatcher,
) -> Option<(&'a str, MatchMethod)> {
    for (candidate_id, candidate_title) in candidates {
        if let Some(method) = run_cascade(title_a, candidate_title, semantic) {
            return Some((candidate_id, method));
        }
    }
    None
}
