//! Application configuration: TOML file plus environment overrides.
//!
//! Grounded on `app/config/mod.rs`'s `Config::load` pattern: read, parse,
//! apply env overrides, validate. Secrets (the venue-B signing key) only
//! ever come from the environment, never from the TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct VenueAConfigToml {
    #[serde(default = "default_venue_a_base_url")]
    pub base_url: String,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for VenueAConfigToml {
    fn default() -> Self {
        Self {
            base_url: default_venue_a_base_url(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

fn default_venue_a_base_url() -> String {
    "https://gamma-api.example-venue-a.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueBConfigToml {
    #[serde(default = "default_venue_b_base_url")]
    pub base_url: String,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    /// Set from `VENUE_B_ACCESS_KEY`/`VENUE_B_PRIVATE_KEY_PATH`; never read
    /// from the TOML file.
    #[serde(skip)]
    pub access_key: Option<String>,
    #[serde(skip)]
    pub private_key_path: Option<PathBuf>,
}

impl Default for VenueBConfigToml {
    fn default() -> Self {
        Self {
            base_url: default_venue_b_base_url(),
            requests_per_second: default_requests_per_second(),
            access_key: None,
            private_key_path: None,
        }
    }
}

fn default_venue_b_base_url() -> String {
    "https://trading-api.example-venue-b.com".to_string()
}

fn default_requests_per_second() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_min_profit_cents")]
    pub min_profit_cents: rust_decimal::Decimal,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_match_cache_path")]
    pub match_cache_path: PathBuf,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_dashboard_port")]
    pub dashboard_port: u16,
    #[serde(default)]
    pub venue_a: VenueAConfigToml,
    #[serde(default)]
    pub venue_b: VenueBConfigToml,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_poll_interval_seconds() -> u64 {
    10
}

fn default_min_profit_cents() -> rust_decimal::Decimal {
    use rust_decimal_macros::dec;
    dec!(1.0)
}

fn default_log_file() -> PathBuf {
    PathBuf::from("opps.csv")
}

fn default_match_cache_path() -> PathBuf {
    PathBuf::from("match_cache.json")
}

fn default_database_url() -> String {
    "marketarb.sqlite3".to_string()
}

fn default_dashboard_port() -> u16 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval_seconds(),
            min_profit_cents: default_min_profit_cents(),
            log_file: default_log_file(),
            match_cache_path: default_match_cache_path(),
            database_url: default_database_url(),
            dashboard_port: default_dashboard_port(),
            venue_a: VenueAConfigToml::default(),
            venue_b: VenueBConfigToml::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path` as TOML, applies environment overrides (spec.md §6),
    /// and validates the result.
    ///
    /// # Errors
    /// Returns `Error::Config` if the file cannot be read/parsed or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.as_ref().display())))?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| Error::Config(format!("parsing config: {e}")))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`] but tolerates a missing file, falling back to
    /// defaults overridden by the environment — useful for quickstart runs
    /// that haven't written a `config.toml` yet.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("POLL_INTERVAL_SECONDS") {
            if let Ok(parsed) = v.parse() {
                self.poll_interval_seconds = parsed;
            }
        }
        if let Ok(v) = std::env::var("MIN_PROFIT_CENTS") {
            if let Ok(parsed) = v.parse() {
                self.min_profit_cents = parsed;
            }
        }
        if let Ok(v) = std::env::var("LOG_FILE") {
            self.log_file = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("DASHBOARD_PORT") {
            if let Ok(parsed) = v.parse() {
                self.dashboard_port = parsed;
            }
        }
        if let Ok(v) = std::env::var("VENUE_B_ACCESS_KEY") {
            self.venue_b.access_key = Some(v);
        }
        if let Ok(v) = std::env::var("VENUE_B_PRIVATE_KEY_PATH") {
            self.venue_b.private_key_path = Some(PathBuf::from(v));
        }
    }

    fn validate(&self) -> Result<()> {
        if self.venue_a.base_url.is_empty() {
            return Err(Error::Config("venue_a.base_url is empty".to_string()));
        }
        if self.venue_b.base_url.is_empty() {
            return Err(Error::Config("venue_b.base_url is empty".to_string()));
        }
        if self.poll_interval_seconds == 0 {
            return Err(Error::Config(
                "poll_interval_seconds must be positive".to_string(),
            ));
        }
        if self.venue_b.access_key.is_some() && self.venue_b.private_key_path.is_none() {
            return Err(Error::Config(
                "VENUE_B_ACCESS_KEY set without VENUE_B_PRIVATE_KEY_PATH".to_string(),
            ));
        }
        if let Some(path) = &self.venue_b.private_key_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "venue-B private key path does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_or_default_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.poll_interval_seconds, 10);
        assert_eq!(config.dashboard_port, 8000);
    }

    #[test]
    fn env_override_wins_over_file_and_default() {
        std::env::set_var("POLL_INTERVAL_SECONDS", "30");
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.poll_interval_seconds, 30);
        std::env::remove_var("POLL_INTERVAL_SECONDS");
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval_seconds = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn access_key_without_key_path_fails_validation() {
        std::env::set_var("VENUE_B_ACCESS_KEY", "some-key");
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_or_default(dir.path().join("missing.toml"));
        assert!(result.is_err());
        std::env::remove_var("VENUE_B_ACCESS_KEY");
    }
}
