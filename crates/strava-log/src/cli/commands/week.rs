//! Week preview command for strava-log

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::config::Settings;
use crate::error::{Result, StravaError};
use crate::report::{render_live, render_permanent};
use crate::storage::{activities_in_week, Storage, Week};

/// Print the report for the week containing `date` without writing anything
pub async fn show(settings: &Settings, date: Option<String>) -> Result<()> {
    let storage = Storage::load(&settings.data_dir);
    let now = Local::now().naive_local();
    let date = resolve_date(date, now.date())?;

    println!("{}", preview(&storage, date, now));
    Ok(())
}

/// Live layout for the current week, permanent layout for any other
fn preview(storage: &Storage, date: NaiveDate, now: NaiveDateTime) -> String {
    let week = Week::containing(date);
    let activities = activities_in_week(&storage.cache, week.anchor());

    if week.contains(now.date()) {
        render_live(&activities, now)
    } else {
        render_permanent(&activities, week, now.date())
    }
}

fn resolve_date(date: Option<String>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .map_err(|_| StravaError::InvalidDateFormat(d)),
        None => Ok(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ActivityKind};
    use chrono::DateTime;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_date() {
        let today = date(2024, 1, 24);
        assert_eq!(resolve_date(None, today).unwrap(), today);
        assert_eq!(
            resolve_date(Some("2024-01-02".to_string()), today).unwrap(),
            date(2024, 1, 2)
        );
        assert!(matches!(
            resolve_date(Some("01/02/2024".to_string()), today),
            Err(StravaError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_preview_layouts() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let mut storage = Storage::load(&data_dir);
        storage.cache.merge([Activity::new(
            9,
            ActivityKind::Swim,
            DateTime::parse_from_rfc3339("2024-01-16T06:00:00Z").unwrap(),
        )
        .with_name("Pool")]);
        let now = date(2024, 1, 24).and_hms_opt(12, 0, 0).unwrap();

        let past = preview(&storage, date(2024, 1, 17), now);
        assert!(past.starts_with("# Week 03 (Mon Jan 15 - Sun Jan 21)"));
        assert!(past.contains("| Jan 16 | Swim | Pool |"));

        let current = preview(&storage, date(2024, 1, 22), now);
        assert!(current.starts_with("# Current Week (Mon Jan 22 - Sun Jan 28)"));
        assert!(current.contains("No activities yet"));

        assert!(!storage.reports.live_path().exists());
        assert!(!storage.reports.weekly_dir().exists());
        assert!(!data_dir.exists());
    }
}
