//! Per-week aggregate statistics

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::Activity;
use crate::storage::Week;

use super::format::{format_duration_hm, format_pace, pluralize};

/// Totals for one week of activities
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub week: Week,
    pub run_miles: f64,
    pub run_count: usize,
    pub run_seconds: u64,
    pub ride_miles: f64,
    pub ride_count: usize,
    pub ride_seconds: u64,
    /// Every activity in the week, whatever its kind
    pub session_count: usize,
    pub total_seconds: u64,
    pub active_days: usize,
    /// Days of the week that have elapsed as of `today` (7 for past weeks)
    pub days_considered: usize,
    /// Whether `today` falls inside this week
    pub is_current: bool,
}

impl WeekSummary {
    /// Aggregate `activities` for `week` as seen on `today`
    ///
    /// Activities outside the week are ignored.
    pub fn compute(activities: &[&Activity], week: Week, today: NaiveDate) -> Self {
        let is_current = week.contains(today);
        let last_considered = if is_current {
            Some(today)
        } else if today > week.sunday() {
            Some(week.sunday())
        } else {
            None
        };
        let days_considered = last_considered
            .map(|last| (last - week.anchor()).num_days() as usize + 1)
            .unwrap_or(0);

        let mut summary = Self {
            week,
            run_miles: 0.0,
            run_count: 0,
            run_seconds: 0,
            ride_miles: 0.0,
            ride_count: 0,
            ride_seconds: 0,
            session_count: 0,
            total_seconds: 0,
            active_days: 0,
            days_considered,
            is_current,
        };

        let mut active_dates = BTreeSet::new();
        for activity in activities.iter().filter(|a| week.contains(a.local_date())) {
            summary.session_count += 1;
            summary.total_seconds += activity.moving_time;

            if activity.kind.is_run() {
                summary.run_count += 1;
                summary.run_miles += activity.distance_miles();
                summary.run_seconds += activity.moving_time;
            } else if activity.kind.is_ride() {
                summary.ride_count += 1;
                summary.ride_miles += activity.distance_miles();
                summary.ride_seconds += activity.moving_time;
            }

            let date = activity.local_date();
            if last_considered.is_some_and(|last| date <= last) {
                active_dates.insert(date);
            }
        }
        summary.active_days = active_dates.len();

        summary
    }

    /// Elapsed days without any activity, within `[0, days_considered]`
    pub fn rest_days(&self) -> usize {
        self.days_considered.saturating_sub(self.active_days)
    }

    /// Aggregate run pace across the week
    pub fn run_pace(&self) -> String {
        format_pace(self.run_seconds, self.run_miles)
    }

    /// The totals block as markdown list items
    pub fn totals_markdown(&self) -> String {
        let mut lines = vec![
            format!(
                "- Running: {:.1} mi | {} | avg pace {}",
                self.run_miles,
                pluralize(self.run_count, "run", "runs"),
                self.run_pace()
            ),
            format!(
                "- Cycling: {:.1} mi | {} | {}",
                self.ride_miles,
                pluralize(self.ride_count, "ride", "rides"),
                format_duration_hm(self.ride_seconds)
            ),
            format!("- Sessions: {}", self.session_count),
        ];

        if self.is_current {
            lines.push(format!(
                "- Rest days so far: {}/{}",
                self.rest_days(),
                self.days_considered
            ));
        } else {
            lines.push(format!("- Rest days: {}", self.rest_days()));
        }
        lines.push(format!(
            "- Total training hours: {}",
            format_duration_hm(self.total_seconds)
        ));

        lines.join("\n")
    }
}
