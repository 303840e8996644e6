//! Sync command for strava-log

use chrono::Local;

use crate::client::StravaClient;
use crate::config::Settings;
use crate::error::Result;
use crate::storage::Storage;
use crate::sync::{SyncEngine, SyncOptions};

/// Run sync operation
pub async fn run(settings: &Settings, force: bool, dry_run: bool, no_catch_up: bool) -> Result<()> {
    let opts = SyncOptions {
        force,
        dry_run,
        catch_up: !no_catch_up,
    };

    let storage = Storage::open(&settings.data_dir)?;
    let client = StravaClient::new()?;
    let mut engine = SyncEngine::new(storage, client, settings.credential_store());
    let now = Local::now().naive_local();

    if opts.dry_run {
        println!("Dry run mode - no changes will be made");
        println!("Using data directory: {}", settings.data_dir.display());
        println!("{}", engine.plan(&opts, now)?);
        return Ok(());
    }

    let stats = engine.run(&opts, now).await?;
    println!("{}", stats);

    Ok(())
}
