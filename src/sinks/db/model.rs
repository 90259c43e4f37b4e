//! Row types for the `opportunities` table.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::Opportunity;

use super::schema::opportunities;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = opportunities)]
pub struct NewOpportunityRow {
    pub ts: String,
    pub bot: String,
    pub market: String,
    pub arb_type: String,
    pub strategy: String,
    pub profit_cents: String,
    pub price_a: Option<String>,
    pub price_b: Option<String>,
    pub source_a: Option<String>,
    pub source_b: Option<String>,
    pub url: Option<String>,
}

impl NewOpportunityRow {
    #[must_use]
    pub fn from_opportunity(bot: &str, opportunity: &Opportunity) -> Self {
        Self {
            ts: opportunity.timestamp.to_rfc3339(),
            bot: bot.to_string(),
            market: opportunity.market_pair.clone(),
            arb_type: opportunity.arb_type.as_str().to_string(),
            strategy: opportunity.strategy.clone(),
            profit_cents: opportunity.profit_cents.to_string(),
            price_a: opportunity.price_a.map(|p| p.to_string()),
            price_b: opportunity.price_b.map(|p| p.to_string()),
            source_a: opportunity.venue_a_id.as_ref().map(ToString::to_string),
            source_b: opportunity.venue_b_id.as_ref().map(ToString::to_string),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = opportunities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OpportunityRow {
    pub id: Option<i32>,
    pub ts: String,
    pub bot: String,
    pub market: String,
    pub arb_type: String,
    pub strategy: String,
    pub profit_cents: String,
    pub price_a: Option<String>,
    pub price_b: Option<String>,
    pub source_a: Option<String>,
    pub source_b: Option<String>,
    pub url: Option<String>,
}

impl OpportunityRow {
    /// Best-effort parse of `ts` back to a `DateTime<Utc>`; rows written by
    /// this crate always round-trip, a malformed value only arises from a
    /// hand-edited database and falls back to "now" rather than erroring.
    #[must_use]
    pub fn parsed_timestamp(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339(&self.ts)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }
}
