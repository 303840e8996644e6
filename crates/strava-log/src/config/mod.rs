mod credentials;

pub use credentials::{CredentialStore, CLIENT_ID_KEY, CLIENT_SECRET_KEY, REFRESH_TOKEN_KEY};

use crate::error::{Result, StravaError};
use std::path::{Path, PathBuf};

/// Default configuration directory name
const CONFIG_DIR_NAME: &str = "strava-log";

const ENV_FILENAME: &str = ".env";

/// Get the configuration directory path
/// Returns ~/.config/strava-log on Unix, ~/Library/Application Support/strava-log on macOS
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(CONFIG_DIR_NAME))
        .ok_or_else(|| StravaError::config("Could not determine config directory"))
}

/// Get the data directory path for the cache and reports
/// Returns ~/.local/share/strava-log on Unix, ~/Library/Application Support/strava-log on macOS
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(CONFIG_DIR_NAME))
        .ok_or_else(|| StravaError::config("Could not determine data directory"))
}

/// Default location of the credentials file
pub fn default_env_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(ENV_FILENAME))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolved locations for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub env_file: PathBuf,
}

impl Settings {
    /// Resolve paths from command-line overrides, falling back to platform defaults
    pub fn resolve(data_dir: Option<PathBuf>, env_file: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => self::data_dir()?,
        };
        let env_file = match env_file {
            Some(file) => file,
            None => default_env_file()?,
        };

        Ok(Self { data_dir, env_file })
    }

    /// Credential store backed by this invocation's env file
    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(&self.env_file)
    }
}
