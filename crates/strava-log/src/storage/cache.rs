//! Durable activity cache
//!
//! A JSON document mapping activity id strings to [`Activity`] records. The
//! cache only grows: merging never overwrites an existing entry, and the only
//! way to drop entries is [`ActivityCache::reset`] before a forced re-sync.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Activity;

/// Days fetched on first run or after a forced reset
pub const BACKFILL_DAYS: i64 = 14;

/// Earliest start time fetched into an empty cache
pub fn backfill_start(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(BACKFILL_DAYS)
}

/// Fetch cursor for an empty cache: `BACKFILL_DAYS` before `now`
pub fn backfill_cursor(now: NaiveDateTime) -> i64 {
    backfill_start(now).and_utc().timestamp()
}

/// File-backed activity cache keyed by activity id
#[derive(Debug, Clone)]
pub struct ActivityCache {
    path: PathBuf,
    entries: BTreeMap<String, Activity>,
}

impl ActivityCache {
    /// Create an empty cache that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache from disk
    ///
    /// A missing file yields an empty cache. So does an unreadable or corrupt
    /// one: losing the cache only costs a re-fetch of the backfill window.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "no activity cache yet");
            return Self::empty(path);
        }

        match read_entries(&path) {
            Ok(entries) => {
                debug!(path = %path.display(), count = entries.len(), "loaded activity cache");
                Self { path, entries }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "activity cache unreadable, starting empty");
                Self::empty(path)
            }
        }
    }

    /// Insert activities whose ids are not cached yet
    ///
    /// Returns the number of newly inserted records. Existing entries are
    /// never replaced, so re-fetching an overlapping window is a no-op.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Activity>) -> usize {
        let mut added = 0;
        for activity in incoming {
            let key = activity.key();
            if !self.entries.contains_key(&key) {
                self.entries.insert(key, activity);
                added += 1;
            }
        }
        added
    }

    /// Start time of the most recent cached activity
    pub fn most_recent_start(&self) -> Option<DateTime<FixedOffset>> {
        self.entries.values().map(|a| a.start_date_local).max()
    }

    /// Lower bound (epoch seconds) for the next fetch
    ///
    /// The most recent cached start time, or `now - BACKFILL_DAYS` when the
    /// cache is empty.
    pub fn fetch_cursor(&self, now: NaiveDateTime) -> i64 {
        match self.most_recent_start() {
            Some(start) => start.timestamp(),
            None => backfill_cursor(now),
        }
    }

    /// Drop every entry (used before a forced full re-sync)
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Write the cache to disk atomically (temp file + rename)
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        super::write_atomic(&self.path, format!("{}\n", json).as_bytes())?;
        debug!(path = %self.path.display(), count = self.entries.len(), "saved activity cache");
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&Activity> {
        self.entries.get(&id.to_string())
    }

    pub fn values(&self) -> impl Iterator<Item = &Activity> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Activity)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse the cache document, migrating the legacy list form
fn read_entries(path: &Path) -> Result<BTreeMap<String, Activity>> {
    let json = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    if value.is_array() {
        let list: Vec<Activity> = serde_json::from_value(value)?;
        debug!(count = list.len(), "migrating list-shaped activity cache");
        return Ok(list.into_iter().map(|a| (a.key(), a)).collect());
    }

    Ok(serde_json::from_value(value)?)
}
