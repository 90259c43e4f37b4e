//! Normalized market and orderbook shapes.

use super::money::Price;
use std::fmt;

/// Which of the two polled venues (or the spot oracle) a market belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Commit-reveal / CLOB venue (venue A).
    CommitReveal,
    /// Signed-request venue (venue B).
    SignedRequest,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::CommitReveal => write!(f, "venue_a"),
            Venue::SignedRequest => write!(f, "venue_b"),
        }
    }
}

/// A venue-local market identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketId(String);

impl MarketId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Into<String>> From<S> for MarketId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A venue-local per-outcome token identifier, present on venues that quote
/// orderbooks per outcome token rather than per market.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenId(String);

impl TokenId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Into<String>> From<S> for TokenId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

/// A market normalized across venue wire formats.
///
/// Identity is `(venue, id)`. Binary markets have `outcome_count == 2`;
/// categorical markets have `outcome_count >= 3` and carry one token id per
/// outcome in `token_ids`.
#[derive(Debug, Clone)]
pub struct Market {
    venue: Venue,
    id: MarketId,
    title: String,
    subtitle: Option<String>,
    outcome_count: u8,
    token_ids: Option<Vec<TokenId>>,
    quoted_yes_ask: Option<Price>,
    quoted_no_ask: Option<Price>,
    category: Option<String>,
    open: bool,
}

impl Market {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        venue: Venue,
        id: impl Into<MarketId>,
        title: impl Into<String>,
        subtitle: Option<String>,
        outcome_count: u8,
        token_ids: Option<Vec<TokenId>>,
        quoted_yes_ask: Option<Price>,
        quoted_no_ask: Option<Price>,
        category: Option<String>,
        open: bool,
    ) -> Self {
        Self {
            venue,
            id: id.into(),
            title: title.into(),
            subtitle,
            outcome_count,
            token_ids,
            quoted_yes_ask,
            quoted_no_ask,
            category,
            open,
        }
    }

    #[must_use]
    pub fn venue(&self) -> Venue {
        self.venue
    }

    #[must_use]
    pub fn id(&self) -> &MarketId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    #[must_use]
    pub fn outcome_count(&self) -> u8 {
        self.outcome_count
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.outcome_count == 2
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        self.outcome_count >= 3
    }

    #[must_use]
    pub fn token_ids(&self) -> Option<&[TokenId]> {
        self.token_ids.as_deref()
    }

    #[must_use]
    pub fn quoted_yes_ask(&self) -> Option<Price> {
        self.quoted_yes_ask
    }

    #[must_use]
    pub fn quoted_no_ask(&self) -> Option<Price> {
        self.quoted_no_ask
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// One outcome's ask price in a categorical orderbook.
#[derive(Debug, Clone)]
pub struct OutcomeAsk {
    token_id: TokenId,
    ask: Price,
}

impl OutcomeAsk {
    #[must_use]
    pub fn new(token_id: impl Into<TokenId>, ask: Price) -> Self {
        Self {
            token_id: token_id.into(),
            ask,
        }
    }

    #[must_use]
    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub fn ask(&self) -> Price {
        self.ask
    }
}

/// A normalized orderbook. Venue-specific ladder shapes are reduced to this
/// at the adapter boundary (see `crate::venue`) — nothing downstream sees
/// venue-specific field names.
#[derive(Debug, Clone)]
pub enum Orderbook {
    /// Two ask prices, one per outcome, for a binary market.
    Binary { yes_ask: Price, no_ask: Price },
    /// A sequence of per-outcome ask prices for a categorical market.
    Categorical { outcomes: Vec<OutcomeAsk> },
}

impl Orderbook {
    #[must_use]
    pub fn binary(yes_ask: Price, no_ask: Price) -> Self {
        Self::Binary { yes_ask, no_ask }
    }

    #[must_use]
    pub fn categorical(outcomes: Vec<OutcomeAsk>) -> Self {
        Self::Categorical { outcomes }
    }

    /// Derive a binary ask pair from a Kalshi-style two-sided price-level
    /// ladder, where the last element of each side is the best bid.
    ///
    /// `ask_for_side_x = (100 - best_bid_of_opposite_side) / 100`.
    #[must_use]
    pub fn from_ladders(yes_levels: &[(i64, i64)], no_levels: &[(i64, i64)]) -> Option<Self> {
        let best_yes_bid = yes_levels.last()?.0;
        let best_no_bid = no_levels.last()?.0;
        let yes_ask = Price::from_cents(100 - best_no_bid);
        let no_ask = Price::from_cents(100 - best_yes_bid);
        Some(Self::binary(yes_ask, no_ask))
    }
}
