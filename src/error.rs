//! Crate-wide error taxonomy.
//!
//! Errors fall into three buckets (see `SPEC_FULL.md` §4): transient
//! transport failures that degrade to "no data" rather than propagate,
//! structural failures that skip one predicate while others proceed, and
//! fatal failures that refuse process startup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("match cache corrupt: {0}")]
    CacheCorrupt(String),

    #[error("rate limited by {venue} after {attempts} attempts")]
    RateLimited { venue: &'static str, attempts: u32 },

    #[error("structural error: {0}")]
    Structural(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("db pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("db error: {0}")]
    Db(#[from] diesel::result::Error),

    #[error("migration error: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
