//! Logical constraints mined between markets on a single venue.

use super::market::MarketId;

/// The relationship a [`LogicalConstraint`] asserts between its markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `price(earlier) <= price(later)`.
    Superset,
    /// `sum(price_i) <= 1 + tolerance`.
    MutualExclusion,
}

/// A mined logical relationship between two or more markets on one venue.
#[derive(Debug, Clone)]
pub struct LogicalConstraint {
    kind: ConstraintKind,
    market_ids: Vec<MarketId>,
    tolerance: rust_decimal::Decimal,
    description: String,
}

impl LogicalConstraint {
    #[must_use]
    pub fn superset(
        earlier: MarketId,
        later: MarketId,
        tolerance: rust_decimal::Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConstraintKind::Superset,
            market_ids: vec![earlier, later],
            tolerance,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn mutual_exclusion(
        market_ids: Vec<MarketId>,
        tolerance: rust_decimal::Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConstraintKind::MutualExclusion,
            market_ids,
            tolerance,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    #[must_use]
    pub fn market_ids(&self) -> &[MarketId] {
        &self.market_ids
    }

    #[must_use]
    pub fn tolerance(&self) -> rust_decimal::Decimal {
        self.tolerance
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// For a superset constraint, `(earlier, later)`. Panics if called on a
    /// constraint that is not a superset — callers branch on `kind()` first.
    #[must_use]
    pub fn as_superset_pair(&self) -> (&MarketId, &MarketId) {
        assert_eq!(self.kind, ConstraintKind::Superset);
        (&self.market_ids[0], &self.market_ids[1])
    }
}
