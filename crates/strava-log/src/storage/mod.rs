//! Local storage for synced activities and generated reports
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/strava-log/
//! ├── activities_cache.json        # Activity cache keyed by id
//! ├── current_week.md              # Live report, rewritten every run
//! └── weekly/
//!     ├── 2024-W02.md              # Permanent reports, written once
//!     └── ...
//! ```
//!
//! The cache and the live report are written atomically (temp file + rename),
//! so a crash mid-write leaves the previous version in place. Permanent
//! reports are created exclusively and never rewritten.

mod cache;
mod reports;
mod week;

pub use cache::{backfill_cursor, backfill_start, ActivityCache, BACKFILL_DAYS};
pub use reports::{parse_week_label, ReportStore};
pub use week::{activities_in_week, week_anchor, week_label, week_range_display, Week};

use std::fs;
use std::path::Path;

use crate::error::Result;

const CACHE_FILENAME: &str = "activities_cache.json";

/// Cache and report storage rooted at one data directory
pub struct Storage {
    pub cache: ActivityCache,
    pub reports: ReportStore,
}

impl Storage {
    /// Open storage under `data_dir`, creating it, and load the activity cache
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self::load(data_dir))
    }

    /// Load storage for reading; a missing `data_dir` is left absent
    pub fn load(data_dir: &Path) -> Self {
        Self {
            cache: ActivityCache::load(data_dir.join(CACHE_FILENAME)),
            reports: ReportStore::new(data_dir),
        }
    }
}

/// Write `contents` to `path` via a sibling temp file and rename
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_open_creates_dir() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let storage = Storage::open(&data_dir).unwrap();
        assert!(data_dir.exists());
        assert!(storage.cache.is_empty());
        assert!(storage.cache.path().ends_with(CACHE_FILENAME));
    }

    #[test]
    fn test_storage_load_does_not_create_dir() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("missing");
        let storage = Storage::load(&data_dir);
        assert!(storage.cache.is_empty());
        assert!(storage.reports.permanent_weeks().unwrap().is_empty());
        assert!(!data_dir.exists());
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("file.md");
        write_atomic(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert!(!temp.path().join("nested").join("file.md.tmp").exists());
    }
}
