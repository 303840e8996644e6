//! Weekly rollover: deciding which past weeks get a permanent report

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::error::Result;
use crate::report::render_permanent;
use crate::storage::{activities_in_week, ActivityCache, ReportStore, Week};

/// Upper bound on permanent reports generated in one run
pub const MAX_CATCH_UP_WEEKS: usize = 52;

/// Decides and writes the permanent reports owed for past weeks
#[derive(Debug, Clone, Copy)]
pub struct RolloverScheduler {
    catch_up: bool,
    coverage_start: Option<NaiveDateTime>,
}

impl Default for RolloverScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RolloverScheduler {
    /// With `catch_up` off only last week is ever considered
    pub fn new(catch_up: bool) -> Self {
        Self {
            catch_up,
            coverage_start: None,
        }
    }

    /// Only consider weeks starting at or after `start`.
    ///
    /// Set when the cache was rebuilt from the backfill window. Last week
    /// always starts inside that window and is unaffected.
    pub fn with_coverage_start(mut self, start: NaiveDateTime) -> Self {
        self.coverage_start = Some(start);
        self
    }

    fn is_covered(&self, week: &Week) -> bool {
        match self.coverage_start {
            Some(start) => week.anchor().and_time(chrono::NaiveTime::MIN) >= start,
            None => true,
        }
    }

    /// Weeks that need a permanent report, oldest first.
    ///
    /// `existing` holds the Monday anchors of reports already written. With
    /// catch-up enabled, every week after the newest existing report through
    /// last week is returned (at most [`MAX_CATCH_UP_WEEKS`], most recent
    /// kept). With no reports at all, only last week is returned. Weeks
    /// before the coverage start, if any, are skipped.
    pub fn pending_weeks(&self, existing: &[NaiveDate], today: NaiveDate) -> Vec<Week> {
        let last_week = Week::containing(today).previous();
        let is_missing = |week: &Week| !existing.contains(&week.anchor());

        let newest = existing
            .iter()
            .copied()
            .filter(|monday| *monday <= last_week.anchor())
            .max();

        let first = match (self.catch_up, newest) {
            (true, Some(newest)) => Week::containing(newest).next(),
            _ => last_week,
        };

        let earliest_allowed =
            last_week.anchor() - Duration::weeks(MAX_CATCH_UP_WEEKS as i64 - 1);
        let mut week = if first.anchor() < earliest_allowed {
            Week::containing(earliest_allowed)
        } else {
            first
        };

        let mut pending = Vec::new();
        while week <= last_week {
            if is_missing(&week) && self.is_covered(&week) {
                pending.push(week);
            }
            week = week.next();
        }
        pending
    }

    /// Generate and write every pending permanent report.
    ///
    /// Returns the weeks whose report was actually created by this call.
    pub fn run(
        &self,
        cache: &ActivityCache,
        reports: &ReportStore,
        today: NaiveDate,
    ) -> Result<Vec<Week>> {
        let existing = reports.permanent_weeks()?;
        let pending = self.pending_weeks(&existing, today);
        debug!(count = pending.len(), "pending permanent reports");

        let mut generated = Vec::new();
        for week in pending {
            let activities = activities_in_week(cache, week.anchor());
            let contents = render_permanent(&activities, week, today);
            if reports.write_permanent(week.anchor(), &contents)? {
                info!(week = %week.label(), activities = activities.len(), "generated weekly summary");
                generated.push(week);
            }
        }
        Ok(generated)
    }
}
