//! Monday-anchored calendar weeks and ISO week labels

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Activity;

use super::cache::ActivityCache;

/// Monday of the week containing `date`
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO week label (YYYY-Www) for a week anchor
///
/// Uses the ISO year, so the week of Monday 2024-12-30 is `2025-W01`.
pub fn week_label(monday: NaiveDate) -> String {
    let iso = monday.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Human-readable range, e.g. `Mon Jan 15 - Sun Jan 21`
pub fn week_range_display(monday: NaiveDate) -> String {
    let sunday = monday + Duration::days(6);
    format!(
        "Mon {} - Sun {}",
        monday.format("%b %d"),
        sunday.format("%b %d")
    )
}

/// All cached activities whose local start date falls within the week,
/// ordered by start time
pub fn activities_in_week(cache: &ActivityCache, monday: NaiveDate) -> Vec<&Activity> {
    let week = Week::new(monday);
    let mut activities: Vec<&Activity> = cache
        .values()
        .filter(|a| week.contains(a.local_date()))
        .collect();
    activities.sort_by(|a, b| {
        a.start_date_local
            .cmp(&b.start_date_local)
            .then(a.id.cmp(&b.id))
    });
    activities
}

/// A Monday-to-Sunday calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week {
    anchor: NaiveDate,
}

impl Week {
    /// Week anchored at `date`, normalised to its Monday
    pub fn new(date: NaiveDate) -> Self {
        Self {
            anchor: week_anchor(date),
        }
    }

    /// Week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn sunday(&self) -> NaiveDate {
        self.anchor + Duration::days(6)
    }

    pub fn label(&self) -> String {
        week_label(self.anchor)
    }

    /// ISO week number
    pub fn number(&self) -> u32 {
        self.anchor.iso_week().week()
    }

    pub fn range_display(&self) -> String {
        week_range_display(self.anchor)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.anchor <= date && date <= self.sunday()
    }

    pub fn previous(&self) -> Self {
        Self {
            anchor: self.anchor - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            anchor: self.anchor + Duration::days(7),
        }
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
