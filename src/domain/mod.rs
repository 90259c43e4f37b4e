//! Pure domain types shared by every component of the pipeline.
//!
//! Nothing in this module knows about HTTP, SQLite, or any specific venue's
//! wire format — adapters translate at the boundary (see `crate::venue`) so
//! the evaluator, matcher, and logical-constraint detector only ever see
//! these normalized shapes.

mod constraint;
mod market;
mod match_cache;
mod money;
mod opportunity;

pub use constraint::{ConstraintKind, LogicalConstraint};
pub use market::{Market, MarketId, Orderbook, OutcomeAsk, TokenId, Venue};
pub use match_cache::{MatchCache, MatchMethod, MatchRecord};
pub use money::Price;
pub use opportunity::{ArbType, Opportunity};
