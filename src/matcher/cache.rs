//! Persistent match-cache file, wrapping `domain::MatchCache` with
//! atomic-rename-on-write semantics.
//!
//! Grounded on `original_source/market_matcher.py`'s `MatchDatabase.save` /
//! `.load`, adapted to the teacher's synchronous-file-write discipline
//! (`SPEC_FULL.md` §5: a cache mutation completes only after its write
//! returns, so a crash after a match cannot "forget" it). Writing to a
//! sibling temp file and renaming over the target keeps a reader from ever
//! observing a half-written cache.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::MatchCache;
use crate::error::{Error, Result};

/// Re-match sweep interval (`original_source/market_matcher.py`'s
/// `REMATCH_INTERVAL`).
pub const DEFAULT_REMATCH_INTERVAL_SECS: i64 = 300;

pub struct PersistedMatchCache {
    path: PathBuf,
    cache: MatchCache,
}

impl PersistedMatchCache {
    /// Loads the cache from `path` if it exists; an empty cache otherwise.
    /// A file that exists but fails to parse is `Error::CacheCorrupt` — a
    /// fatal startup failure per `SPEC_FULL.md` §4, not a silent reset.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::CacheCorrupt(format!("{}: {e}", path.display())))?
        } else {
            MatchCache::default()
        };
        Ok(Self { path, cache })
    }

    #[must_use]
    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    #[must_use]
    pub fn cache_mut(&mut self) -> &mut MatchCache {
        &mut self.cache
    }

    /// Serializes the cache to a temp file beside `path` and renames it
    /// into place, so a reader (or a crash mid-write) never sees a partial
    /// file.
    pub fn flush(&self) -> Result<()> {
        write_atomic(&self.path, &self.cache)
    }

    /// Should the re-match sweep run again? Mirrors
    /// `should_rematch_unmatched`'s "no prior scan, or interval elapsed"
    /// check.
    #[must_use]
    pub fn due_for_rematch_sweep(&self, now: DateTime<Utc>, interval_secs: i64) -> bool {
        match self.cache.last_full_scan {
            None => true,
            Some(last) => (now - last).num_seconds() >= interval_secs,
        }
    }
}

fn write_atomic(path: &Path, cache: &MatchCache) -> Result<()> {
    let json = serde_json::to_string_pretty(cache)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketId;

    #[test]
    fn missing_file_loads_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_cache.json");
        let loaded = PersistedMatchCache::load(&path).unwrap();
        assert!(loaded.cache().matched.is_empty());
    }

    #[test]
    fn flush_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_cache.json");
        let mut persisted = PersistedMatchCache::load(&path).unwrap();
        persisted
            .cache_mut()
            .record_match(&MarketId::from("a1"), &MarketId::from("b1"));
        persisted.flush().unwrap();

        let reloaded = PersistedMatchCache::load(&path).unwrap();
        assert_eq!(
            reloaded.cache().get_match(&MarketId::from("a1")),
            Some(MarketId::from("b1"))
        );
    }

    #[test]
    fn corrupt_file_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_cache.json");
        std::fs::write(&path, "not json").unwrap();
        let err = PersistedMatchCache::load(&path).unwrap_err();
        assert!(matches!(err, Error::CacheCorrupt(_)));
    }

    #[test]
    fn no_prior_scan_is_immediately_due() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_cache.json");
        let persisted = PersistedMatchCache::load(&path).unwrap();
        assert!(persisted.due_for_rematch_sweep(Utc::now(), DEFAULT_REMATCH_INTERVAL_SECS));
    }

    #[test]
    fn recent_scan_is_not_yet_due() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match_cache.json");
        let mut persisted = PersistedMatchCache::load(&path).unwrap();
        let now = Utc::now();
        persisted.cache_mut().set_last_full_scan(now);
        assert!(!persisted.due_for_rematch_sweep(now, DEFAULT_REMATCH_INTERVAL_SECS));
    }
}
