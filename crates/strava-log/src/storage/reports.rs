//! Report files: the live current-week view and write-once weekly summaries

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;

use super::week::week_label;

const CURRENT_WEEK_FILENAME: &str = "current_week.md";
const WEEKLY_DIR_NAME: &str = "weekly";

/// Location of the live report and the permanent weekly reports
#[derive(Debug, Clone)]
pub struct ReportStore {
    live_path: PathBuf,
    weekly_dir: PathBuf,
}

impl ReportStore {
    /// Reports stored under `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            live_path: data_dir.join(CURRENT_WEEK_FILENAME),
            weekly_dir: data_dir.join(WEEKLY_DIR_NAME),
        }
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    pub fn weekly_dir(&self) -> &Path {
        &self.weekly_dir
    }

    /// Path of the permanent report for the week anchored at `monday`
    pub fn permanent_path(&self, monday: NaiveDate) -> PathBuf {
        self.weekly_dir.join(format!("{}.md", week_label(monday)))
    }

    /// Overwrite the live report
    pub fn write_live(&self, contents: &str) -> Result<()> {
        super::write_atomic(&self.live_path, contents.as_bytes())?;
        debug!(path = %self.live_path.display(), "live report written");
        Ok(())
    }

    /// Write a permanent report unless one already exists
    ///
    /// Returns `true` when the file was created and `false` when a report for
    /// that week was already present, in which case it is left untouched.
    pub fn write_permanent(&self, monday: NaiveDate, contents: &str) -> Result<bool> {
        fs::create_dir_all(&self.weekly_dir)?;
        let path = self.permanent_path(monday);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "permanent report exists, skipping");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(contents.as_bytes()).and_then(|_| file.sync_all()) {
            // Never leave a partial permanent report behind
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }

        info!(path = %path.display(), "permanent weekly report written");
        Ok(true)
    }

    /// Week anchors of all existing permanent reports, oldest first
    pub fn permanent_weeks(&self) -> Result<Vec<NaiveDate>> {
        if !self.weekly_dir.exists() {
            return Ok(Vec::new());
        }

        let mut weeks = Vec::new();
        for entry in fs::read_dir(&self.weekly_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(monday) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_week_label)
            {
                weeks.push(monday);
            }
        }
        weeks.sort();
        Ok(weeks)
    }
}

/// Parse a `YYYY-Www` label back to its Monday
pub fn parse_week_label(label: &str) -> Option<NaiveDate> {
    let (year, week) = label.split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_paths() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path());
        assert!(store.live_path().ends_with("current_week.md"));
        assert!(store
            .permanent_path(monday())
            .ends_with("weekly/2024-W03.md"));
    }

    #[test]
    fn test_write_permanent_is_write_once() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path());

        assert!(store.write_permanent(monday(), "first\n").unwrap());
        assert!(store.permanent_path(monday()).exists());
        assert!(!store.write_permanent(monday(), "second\n").unwrap());

        let contents = fs::read_to_string(store.permanent_path(monday())).unwrap();
        assert_eq!(contents, "first\n");
    }

    #[test]
    fn test_write_live_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path());

        store.write_live("one\n").unwrap();
        store.write_live("two\n").unwrap();
        assert_eq!(fs::read_to_string(store.live_path()).unwrap(), "two\n");
    }

    #[test]
    fn test_permanent_weeks_sorted() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(temp.path());
        let earlier = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();

        store.write_permanent(monday(), "b").unwrap();
        store.write_permanent(earlier, "a").unwrap();
        fs::write(store.weekly_dir().join("notes.txt"), "ignored").unwrap();
        fs::write(store.weekly_dir().join("draft.md"), "ignored").unwrap();

        assert_eq!(store.permanent_weeks().unwrap(), vec![earlier, monday()]);
    }

    #[test]
    fn test_permanent_weeks_without_dir() {
        let temp = TempDir::new().unwrap();
        let store = ReportStore::new(&temp.path().join("missing"));
        assert!(store.permanent_weeks().unwrap().is_empty());
    }

    #[test]
    fn test_parse_week_label() {
        assert_eq!(parse_week_label("2024-W03"), Some(monday()));
        assert_eq!(
            parse_week_label("2025-W01"),
            NaiveDate::from_ymd_opt(2024, 12, 30)
        );
        assert_eq!(parse_week_label("2024-03"), None);
        assert_eq!(parse_week_label("2024-W99"), None);
    }
}
