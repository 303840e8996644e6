//! Markdown rendering of weekly reports

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::Activity;
use crate::storage::Week;

use super::format::{
    format_distance, format_duration, format_heart_rate, pace_or_speed, EMPTY_CELL,
};
use super::summary::WeekSummary;

const TABLE_HEADER: &str = "| Date | Type | Name | Dist | Time | Pace/Speed | Avg HR |";
const TABLE_RULE: &str = "|------|------|------|------|------|------------|--------|";

/// Sections left for manual annotation in permanent reports
const NOTE_SECTIONS: [&str; 2] = ["Body & Injury Notes", "Training Notes"];

/// One markdown table row for an activity
pub fn activity_row(activity: &Activity) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} | {} |",
        activity.start_date_local.format("%b %d"),
        activity.kind.short_label(),
        activity.name,
        format_distance(activity.distance_miles()),
        format_duration(activity.moving_time),
        pace_or_speed(activity),
        format_heart_rate(activity)
    )
}

fn placeholder_row(text: &str) -> String {
    format!(
        "| {e} | {e} | {} | {e} | {e} | {e} | {e} |",
        text,
        e = EMPTY_CELL
    )
}

fn push_activity_table(lines: &mut Vec<String>, activities: &[&Activity], empty_text: &str) {
    lines.push("## Activities".to_string());
    lines.push(TABLE_HEADER.to_string());
    lines.push(TABLE_RULE.to_string());
    if activities.is_empty() {
        lines.push(placeholder_row(empty_text));
    } else {
        lines.extend(activities.iter().map(|a| activity_row(a)));
    }
}

/// Render the live report for the week containing `now`
pub fn render_live(activities: &[&Activity], now: NaiveDateTime) -> String {
    let week = Week::containing(now.date());
    let summary = WeekSummary::compute(activities, week, now.date());

    let mut lines = vec![
        format!("# Current Week ({})", week.range_display()),
        format!("*Last updated: {}*", now.format("%Y-%m-%d %H:%M")),
        String::new(),
        "## Totals".to_string(),
        summary.totals_markdown(),
        String::new(),
    ];
    push_activity_table(&mut lines, activities, "No activities yet");
    lines.push(String::new());

    lines.join("\n") + "\n"
}

/// Render the permanent report for a past week
///
/// Includes empty note sections meant to be filled in by hand afterwards.
pub fn render_permanent(activities: &[&Activity], week: Week, today: NaiveDate) -> String {
    let summary = WeekSummary::compute(activities, week, today);

    let mut lines = vec![
        format!("# Week {:02} ({})", week.number(), week.range_display()),
        String::new(),
        "## Totals".to_string(),
        summary.totals_markdown(),
        String::new(),
    ];
    push_activity_table(&mut lines, activities, "No activities");

    for section in NOTE_SECTIONS {
        lines.push(String::new());
        lines.push(format!("## {}", section));
        lines.push("- (to be filled in)".to_string());
    }
    lines.push(String::new());

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, METERS_PER_MILE};
    use chrono::DateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn morning_run() -> Activity {
        Activity::new(
            42,
            ActivityKind::Run,
            DateTime::parse_from_rfc3339("2024-01-16T07:00:00Z").unwrap(),
        )
        .with_name("Tempo Tuesday")
        .with_distance(6.2 * METERS_PER_MILE)
        .with_moving_time(3720)
        .with_heart_rate(155.6)
    }

    #[test]
    fn test_activity_row() {
        assert_eq!(
            activity_row(&morning_run()),
            "| Jan 16 | Run | Tempo Tuesday | 6.2 mi | 1:02:00 | 10:00/mi | 155 |"
        );
    }

    #[test]
    fn test_activity_row_without_distance() {
        let yoga = Activity::new(
            7,
            ActivityKind::Yoga,
            DateTime::parse_from_rfc3339("2024-01-18T19:00:00Z").unwrap(),
        )
        .with_name("Evening flow")
        .with_moving_time(1800);
        assert_eq!(
            activity_row(&yoga),
            "| Jan 18 | Yoga | Evening flow | — | 30:00 | — |  |"
        );
    }

    #[test]
    fn test_render_live_empty() {
        let now = date(2024, 1, 17).and_hms_opt(8, 5, 0).unwrap();
        let report = render_live(&[], now);

        assert!(report.starts_with("# Current Week (Mon Jan 15 - Sun Jan 21)\n"));
        assert!(report.contains("*Last updated: 2024-01-17 08:05*"));
        assert!(report.contains("| — | — | No activities yet | — | — | — | — |"));
        assert!(report.contains("- Rest days so far: 3/3"));
        assert!(!report.contains("Training Notes"));
    }

    #[test]
    fn test_render_permanent() {
        let run = morning_run();
        let report = render_permanent(&[&run], Week::containing(date(2024, 1, 15)), date(2024, 1, 22));

        assert!(report.starts_with("# Week 03 (Mon Jan 15 - Sun Jan 21)\n"));
        assert!(report.contains("- Running: 6.2 mi | 1 run | avg pace 10:00/mi"));
        assert!(report.contains("- Rest days: 6"));
        assert!(report.contains("| Jan 16 | Run | Tempo Tuesday |"));
        assert!(report.contains("## Body & Injury Notes\n- (to be filled in)"));
        assert!(report.contains("## Training Notes\n- (to be filled in)"));
    }

    #[test]
    fn test_render_permanent_empty() {
        let report = render_permanent(&[], Week::containing(date(2024, 1, 15)), date(2024, 1, 22));
        assert!(report.contains("| — | — | No activities | — | — | — | — |"));
        assert!(report.contains("- Rest days: 7"));
    }
}
