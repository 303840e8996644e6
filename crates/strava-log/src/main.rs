use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strava_log::cli::commands;
use strava_log::config::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strava-log")]
#[command(author, version, about = "Incremental Strava sync with weekly markdown reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the activity cache and reports
    #[arg(long, global = true, env = "STRAVA_LOG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to the .env file with Strava credentials
    #[arg(long, global = true, env = "STRAVA_LOG_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new activities and update weekly reports
    Sync {
        /// Discard the cache and re-fetch the last 14 days
        #[arg(long)]
        force: bool,
        /// Dry run (plan only, don't execute)
        #[arg(long)]
        dry_run: bool,
        /// Only generate last week's summary, even if earlier weeks are missing
        #[arg(long)]
        no_catch_up: bool,
    },
    /// Show cache and report status
    Status,
    /// Preview the report for a week without writing it
    Week {
        /// Any date in the week (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> strava_log::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match Settings::resolve(cli.data_dir, cli.env_file) {
        Ok(settings) => match cli.command {
            Commands::Sync {
                force,
                dry_run,
                no_catch_up,
            } => commands::sync_run(&settings, force, dry_run, no_catch_up).await,
            Commands::Status => commands::status(&settings).await,
            Commands::Week { date } => commands::show_week(&settings, date).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", strava_log::error::format_user_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
