//! Sync module for Strava activity synchronization
//!
//! One run of [`SyncEngine::run`]:
//! - refreshes the access token (persisting a rotated refresh token)
//! - fetches activities after the cache cursor, merging page by page
//! - saves the cache, even when a later page fails
//! - writes any owed permanent weekly reports, then the live report

pub mod rollover;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::client::StravaClient;
use crate::config::CredentialStore;
use crate::report::render_live;
use crate::storage::{activities_in_week, backfill_cursor, backfill_start, Storage, Week};
use crate::Result;

pub use rollover::{RolloverScheduler, MAX_CATCH_UP_WEEKS};

/// Options for sync operation
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Discard the cache and re-fetch the backfill window
    pub force: bool,
    /// Dry run (plan only, don't execute)
    pub dry_run: bool,
    /// Generate permanent reports for every missed week, not just last week
    pub catch_up: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            dry_run: false,
            catch_up: true,
        }
    }
}

/// What a run would do, computed without touching the network or disk
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// Epoch seconds passed as `after` to the activities endpoint
    pub cursor: i64,
    /// Cached activities the run starts from
    pub cached: usize,
    /// Permanent reports that would be generated
    pub pending_weeks: Vec<Week>,
    /// Week the live report would cover
    pub current_week: Week,
}

impl std::fmt::Display for SyncPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cached activities: {}", self.cached)?;
        write!(f, "Fetch after: {} ({})", self.cursor, format_epoch(self.cursor))?;
        writeln!(f)?;
        if self.pending_weeks.is_empty() {
            writeln!(f, "Weekly summaries to generate: none")?;
        } else {
            let labels: Vec<String> = self.pending_weeks.iter().map(Week::label).collect();
            writeln!(f, "Weekly summaries to generate: {}", labels.join(", "))?;
        }
        write!(f, "Current week: {}", self.current_week.label())
    }
}

/// Statistics from sync operation
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncStats {
    /// Records returned by the activities endpoint
    pub fetched: usize,
    /// Records that were not already cached
    pub added: usize,
    /// Cache size after the run
    pub total_cached: usize,
    /// Whether the live report was rewritten
    pub live_report: bool,
    /// Labels of permanent reports created by this run
    pub generated: Vec<String>,
}

impl std::fmt::Display for SyncStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.added {
            0 => write!(f, "No new activities.")?,
            1 => write!(f, "Fetched 1 new activity.")?,
            n => write!(f, "Fetched {} new activities.", n)?,
        }
        if self.live_report {
            write!(f, " Current week file updated.")?;
        }
        for label in &self.generated {
            write!(f, " Generated weekly summary: {}.", label)?;
        }
        Ok(())
    }
}

fn format_epoch(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "invalid".to_string())
}

/// Rollover for a run; a cache rebuilt from scratch only covers the backfill window
fn scheduler(opts: &SyncOptions, starts_empty: bool, now: NaiveDateTime) -> RolloverScheduler {
    let scheduler = RolloverScheduler::new(opts.catch_up);
    if starts_empty {
        scheduler.with_coverage_start(backfill_start(now))
    } else {
        scheduler
    }
}

/// Sync engine for orchestrating one incremental sync
pub struct SyncEngine {
    storage: Storage,
    client: StravaClient,
    credentials: CredentialStore,
}

impl SyncEngine {
    pub fn new(storage: Storage, client: StravaClient, credentials: CredentialStore) -> Self {
        Self {
            storage,
            client,
            credentials,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Compute what a run at `now` would do
    pub fn plan(&self, opts: &SyncOptions, now: NaiveDateTime) -> Result<SyncPlan> {
        let today = now.date();
        let (cursor, cached) = if opts.force {
            (backfill_cursor(now), 0)
        } else {
            (self.storage.cache.fetch_cursor(now), self.storage.cache.len())
        };

        let starts_empty = opts.force || self.storage.cache.is_empty();
        let existing = self.storage.reports.permanent_weeks()?;
        let pending_weeks = scheduler(opts, starts_empty, now).pending_weeks(&existing, today);

        Ok(SyncPlan {
            cursor,
            cached,
            pending_weeks,
            current_week: Week::containing(today),
        })
    }

    /// Run sync operation, treating `now` as the local wall-clock time
    pub async fn run(&mut self, opts: &SyncOptions, now: NaiveDateTime) -> Result<SyncStats> {
        let credentials = self.credentials.load()?;

        if opts.force {
            info!(
                discarded = self.storage.cache.len(),
                "force sync: discarding cached activities"
            );
            self.storage.cache.reset();
        }

        let starts_empty = self.storage.cache.is_empty();
        let cursor = self.storage.cache.fetch_cursor(now);
        debug!(cursor, at = %format_epoch(cursor), starts_empty, "fetch cursor");

        let token = self.client.refresh_access_token(&credentials).await?;
        if let Some(rotated) = token.rotated_refresh_token(&credentials.refresh_token) {
            self.credentials.save_refresh_token(rotated)?;
        }

        let mut stats = SyncStats::default();
        let Self { storage, client, .. } = self;
        let cache = &mut storage.cache;

        let fetched = client
            .fetch_activities_after(&token, cursor, |batch| {
                stats.added += cache.merge(batch);
            })
            .await;

        match fetched {
            Ok(count) => stats.fetched = count,
            Err(e) => {
                warn!(added = stats.added, "fetch failed, saving merged activities");
                cache.save()?;
                return Err(e);
            }
        }

        cache.save()?;
        stats.total_cached = cache.len();
        info!(
            fetched = stats.fetched,
            added = stats.added,
            total = stats.total_cached,
            "activity cache updated"
        );

        let today = now.date();
        let generated =
            scheduler(opts, starts_empty, now).run(&storage.cache, &storage.reports, today)?;
        stats.generated = generated.iter().map(Week::label).collect();

        let this_week = Week::containing(today);
        let activities = activities_in_week(&storage.cache, this_week.anchor());
        storage.reports.write_live(&render_live(&activities, now))?;
        stats.live_report = true;

        Ok(stats)
    }
}
