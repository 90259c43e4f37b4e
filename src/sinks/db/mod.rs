//! SQLite persistence for emitted opportunities, via Diesel + r2d2.

pub mod model;
pub mod schema;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::domain::Opportunity;
use crate::error::Result;

use model::{NewOpportunityRow, OpportunityRow};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Creates a connection pool for `database_url` and runs any pending
/// migrations before handing it back.
///
/// # Errors
/// Returns `Error::Pool` if the pool cannot be built, or `Error::Migration`
/// if a pending migration fails to apply.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(5).build(manager)?;
    {
        let mut conn = pool.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| crate::error::Error::Migration(e.to_string()))?;
    }
    Ok(pool)
}

/// Inserts one opportunity row, tagged with the bot/strategy name per
/// spec.md §4.6.
///
/// # Errors
/// Returns `Error::Pool` if no connection is available, or `Error::Db` if
/// the insert fails.
pub fn insert_opportunity(pool: &DbPool, bot: &str, opportunity: &Opportunity) -> Result<()> {
    use schema::opportunities::dsl;

    let mut conn = pool.get()?;
    let row = NewOpportunityRow::from_opportunity(bot, opportunity);
    diesel::insert_into(dsl::opportunities)
        .values(&row)
        .execute(&mut conn)?;
    Ok(())
}

/// Fetches the most recently inserted rows, newest first, for dashboard
/// backfill on startup.
///
/// # Errors
/// Returns `Error::Pool` if no connection is available, or `Error::Db` if
/// the query fails.
pub fn recent_rows(pool: &DbPool, limit: i64) -> Result<Vec<OpportunityRow>> {
    use schema::opportunities::dsl;

    let mut conn = pool.get()?;
    let rows = dsl::opportunities
        .order(dsl::id.desc())
        .limit(limit)
        .select(OpportunityRow::as_select())
        .load(&mut conn)?;
    Ok(rows)
}
