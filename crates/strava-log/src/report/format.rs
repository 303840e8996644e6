//! Markdown cell formatting

use crate::models::Activity;

/// Placeholder for values that cannot be computed
pub const EMPTY_CELL: &str = "—";

/// Distances at or below this many miles are shown as [`EMPTY_CELL`]
const MIN_DISPLAY_MILES: f64 = 0.05;

/// Format seconds as H:MM:SS, or M:SS under an hour
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format seconds as `Xh YYm`, or `Mm` under an hour
pub fn format_duration_hm(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a run pace as `M:SS/mi`
pub fn format_pace(moving_seconds: u64, miles: f64) -> String {
    if miles <= 0.0 {
        return EMPTY_CELL.to_string();
    }

    let pace_min = (moving_seconds as f64 / 60.0) / miles;
    let mut whole_min = pace_min.floor() as u64;
    let mut frac_sec = ((pace_min - whole_min as f64) * 60.0).round() as u64;
    if frac_sec == 60 {
        whole_min += 1;
        frac_sec = 0;
    }
    format!("{}:{:02}/mi", whole_min, frac_sec)
}

/// Format a ride speed as `X.X mph`
pub fn format_speed(miles: f64, moving_seconds: u64) -> String {
    if moving_seconds == 0 {
        return EMPTY_CELL.to_string();
    }
    let mph = miles / (moving_seconds as f64 / 3600.0);
    format!("{:.1} mph", mph)
}

/// Format a distance in miles, suppressing GPS noise
pub fn format_distance(miles: f64) -> String {
    if miles > MIN_DISPLAY_MILES {
        format!("{:.1} mi", miles)
    } else {
        EMPTY_CELL.to_string()
    }
}

/// Pace for runs, speed for rides, nothing for other kinds
pub fn pace_or_speed(activity: &Activity) -> String {
    let miles = activity.distance_miles();
    if activity.kind.is_run() {
        format_pace(activity.moving_time, miles)
    } else if activity.kind.is_ride() {
        format_speed(miles, activity.moving_time)
    } else {
        EMPTY_CELL.to_string()
    }
}

/// Average heart rate, truncated to whole bpm; blank when not recorded
pub fn format_heart_rate(activity: &Activity) -> String {
    activity
        .heart_rate
        .map(|hr| format!("{}", hr as u64))
        .unwrap_or_default()
}

/// `1 run` / `3 runs`
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityKind, METERS_PER_MILE};
    use chrono::DateTime;

    fn activity(kind: ActivityKind, meters: f64, seconds: u64) -> Activity {
        Activity::new(
            1,
            kind,
            DateTime::parse_from_rfc3339("2024-01-15T07:00:00Z").unwrap(),
        )
        .with_distance(meters)
        .with_moving_time(seconds)
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn test_format_duration_hm() {
        assert_eq!(format_duration_hm(5400), "1h 30m");
        assert_eq!(format_duration_hm(3600), "1h 00m");
        assert_eq!(format_duration_hm(2700), "45m");
        assert_eq!(format_duration_hm(0), "0m");
    }

    #[test]
    fn test_format_pace_exact() {
        // 62 minutes over 6.2 miles
        assert_eq!(format_pace(3720, 6.2), "10:00/mi");
    }

    #[test]
    fn test_format_pace_rounding_carries() {
        // 8:59.7 per mile rounds up to 9:00
        assert_eq!(format_pace(539 * 10 + 7, 10.0), "9:00/mi");
        assert_eq!(format_pace(1500, 3.0), "8:20/mi");
    }

    #[test]
    fn test_format_pace_zero_distance() {
        assert_eq!(format_pace(1200, 0.0), EMPTY_CELL);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(20.0, 3600), "20.0 mph");
        assert_eq!(format_speed(15.5, 0), EMPTY_CELL);
    }

    #[test]
    fn test_format_distance_noise_threshold() {
        assert_eq!(format_distance(0.04), EMPTY_CELL);
        assert_eq!(format_distance(0.0), EMPTY_CELL);
        assert_eq!(format_distance(3.14), "3.1 mi");
    }

    #[test]
    fn test_pace_or_speed_by_kind() {
        let run = activity(ActivityKind::Run, 3.0 * METERS_PER_MILE, 1500);
        assert_eq!(pace_or_speed(&run), "8:20/mi");

        let ride = activity(ActivityKind::VirtualRide, 20.0 * METERS_PER_MILE, 3600);
        assert_eq!(pace_or_speed(&ride), "20.0 mph");

        let yoga = activity(ActivityKind::Yoga, 0.0, 3600);
        assert_eq!(pace_or_speed(&yoga), EMPTY_CELL);
    }

    #[test]
    fn test_format_heart_rate() {
        let plain = activity(ActivityKind::Run, 1000.0, 300);
        assert_eq!(format_heart_rate(&plain), "");
        assert_eq!(format_heart_rate(&plain.with_heart_rate(151.9)), "151");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "run", "runs"), "1 run");
        assert_eq!(pluralize(0, "run", "runs"), "0 runs");
    }
}
