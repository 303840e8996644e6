//! Status command for strava-log

use chrono::{DateTime, Local, Utc};

use crate::config::Settings;
use crate::error::Result;
use crate::storage::{week_label, Storage};

/// Show cache, report and credential status
pub async fn status(settings: &Settings) -> Result<()> {
    let storage = Storage::load(&settings.data_dir);
    let cache = &storage.cache;
    let now = Local::now().naive_local();

    println!("Strava Log Status");
    println!("{}", "-".repeat(40));
    println!("Data directory:   {}", settings.data_dir.display());
    println!("Env file:         {}", settings.env_file.display());
    println!(
        "Credentials:      {}",
        if settings.credential_store().has_credentials() {
            "configured"
        } else {
            "missing"
        }
    );
    println!("Activities:       {}", cache.len());

    match cache.most_recent_start() {
        Some(start) => println!("Most recent:      {}", start.format("%Y-%m-%d %H:%M")),
        None => println!("Most recent:      -"),
    }

    let cursor = cache.fetch_cursor(now);
    let cursor_display = DateTime::<Utc>::from_timestamp(cursor, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| cursor.to_string());
    println!("Next fetch after: {}", cursor_display);

    let weeks = storage.reports.permanent_weeks()?;
    if weeks.is_empty() {
        println!("Weekly summaries: none");
    } else {
        let first = weeks.first().map(|w| week_label(*w)).unwrap_or_default();
        let last = weeks.last().map(|w| week_label(*w)).unwrap_or_default();
        println!("Weekly summaries: {} ({} .. {})", weeks.len(), first, last);
    }

    let live = storage.reports.live_path();
    if live.exists() {
        println!("Current week:     {}", live.display());
    } else {
        println!("Current week:     not generated yet");
    }

    Ok(())
}
