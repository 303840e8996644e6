use crate::client::ClientCredentials;
use crate::error::{Result, StravaError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CLIENT_ID_KEY: &str = "STRAVA_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "STRAVA_CLIENT_SECRET";
pub const REFRESH_TOKEN_KEY: &str = "STRAVA_REFRESH_TOKEN";

/// Manages the Strava credentials kept in a `.env` file.
///
/// Values set in the process environment take precedence over the file.
/// The file is parsed with dotenvy without touching the process environment.
pub struct CredentialStore {
    env_file: PathBuf,
    use_process_env: bool,
}

impl CredentialStore {
    /// Create a store over `env_file`, with process environment overrides
    pub fn new(env_file: impl Into<PathBuf>) -> Self {
        Self {
            env_file: env_file.into(),
            use_process_env: true,
        }
    }

    /// Create a store that only reads `env_file` (for testing)
    pub fn file_only(env_file: impl Into<PathBuf>) -> Self {
        Self {
            env_file: env_file.into(),
            use_process_env: false,
        }
    }

    /// Path of the backing env file
    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    fn read_file(&self) -> Result<HashMap<String, String>> {
        if !self.env_file.exists() {
            return Ok(HashMap::new());
        }

        let iter = dotenvy::from_path_iter(&self.env_file).map_err(|e| {
            StravaError::config(format!("Failed to read {}: {}", self.env_file.display(), e))
        })?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                StravaError::config(format!("Failed to parse {}: {}", self.env_file.display(), e))
            })?;
            values.insert(key, value);
        }
        Ok(values)
    }

    fn lookup(&self, file_values: &HashMap<String, String>, key: &str) -> Option<String> {
        let from_env = if self.use_process_env {
            std::env::var(key).ok()
        } else {
            None
        };

        from_env
            .or_else(|| file_values.get(key).cloned())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Load all three credentials, failing if any is missing or blank
    pub fn load(&self) -> Result<ClientCredentials> {
        let file_values = self.read_file()?;

        let client_id = self.lookup(&file_values, CLIENT_ID_KEY);
        let client_secret = self.lookup(&file_values, CLIENT_SECRET_KEY);
        let refresh_token = self.lookup(&file_values, REFRESH_TOKEN_KEY);

        match (client_id, client_secret, refresh_token) {
            (Some(id), Some(secret), Some(refresh)) => {
                debug!(env_file = %self.env_file.display(), "loaded Strava credentials");
                Ok(ClientCredentials::new(id, secret, refresh))
            }
            _ => Err(StravaError::MissingCredentials {
                env_file: self.env_file.clone(),
            }),
        }
    }

    /// Check if credentials exist
    pub fn has_credentials(&self) -> bool {
        self.load().is_ok()
    }

    /// Persist a rotated refresh token back to the env file.
    ///
    /// Replaces the existing `STRAVA_REFRESH_TOKEN=` line, or appends one if
    /// absent. Every other line is kept as written.
    pub fn save_refresh_token(&self, token: &str) -> Result<()> {
        let existing = if self.env_file.exists() {
            fs::read_to_string(&self.env_file)?
        } else {
            String::new()
        };

        let contents = replace_env_line(&existing, REFRESH_TOKEN_KEY, token);

        if let Some(parent) = self.env_file.parent() {
            super::ensure_dir(parent)?;
        }
        fs::write(&self.env_file, contents)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.env_file, fs::Permissions::from_mode(0o600))?;
        }

        info!(env_file = %self.env_file.display(), "saved rotated refresh token");
        Ok(())
    }
}

/// Set `key=value` in env-file text, replacing the first matching line
fn replace_env_line(contents: &str, key: &str, value: &str) -> String {
    let prefix = format!("{}=", key);
    let new_line = format!("{}{}", prefix, value);
    let mut replaced = false;

    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            if !replaced && line.trim_start().starts_with(&prefix) {
                replaced = true;
                new_line.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !replaced {
        lines.push(new_line);
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(".env");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_credentials() {
        let temp = TempDir::new().unwrap();
        let path = write_env(
            &temp,
            "STRAVA_CLIENT_ID=123\nSTRAVA_CLIENT_SECRET=shh\nSTRAVA_REFRESH_TOKEN=abc\n",
        );
        let store = CredentialStore::file_only(&path);

        let creds = store.load().unwrap();
        assert_eq!(creds, ClientCredentials::new("123", "shh", "abc"));
        assert!(store.has_credentials());
    }

    #[test]
    fn test_missing_file_is_missing_credentials() {
        let temp = TempDir::new().unwrap();
        let store = CredentialStore::file_only(temp.path().join(".env"));

        match store.load() {
            Err(StravaError::MissingCredentials { env_file }) => {
                assert_eq!(env_file, temp.path().join(".env"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!store.has_credentials());
    }

    #[test]
    fn test_blank_value_is_missing() {
        let temp = TempDir::new().unwrap();
        let path = write_env(
            &temp,
            "STRAVA_CLIENT_ID=123\nSTRAVA_CLIENT_SECRET=\nSTRAVA_REFRESH_TOKEN=abc\n",
        );
        let store = CredentialStore::file_only(&path);
        assert!(matches!(
            store.load(),
            Err(StravaError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_save_refresh_token_replaces_line() {
        let temp = TempDir::new().unwrap();
        let path = write_env(
            &temp,
            "# strava app\nSTRAVA_CLIENT_ID=123\nSTRAVA_REFRESH_TOKEN=old\nSTRAVA_CLIENT_SECRET=shh\n",
        );
        let store = CredentialStore::file_only(&path);

        store.save_refresh_token("new").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "# strava app\nSTRAVA_CLIENT_ID=123\nSTRAVA_REFRESH_TOKEN=new\nSTRAVA_CLIENT_SECRET=shh\n"
        );
        assert_eq!(store.load().unwrap().refresh_token, "new");
    }

    #[test]
    fn test_save_refresh_token_appends_when_absent() {
        let temp = TempDir::new().unwrap();
        let path = write_env(&temp, "STRAVA_CLIENT_ID=123\nSTRAVA_CLIENT_SECRET=shh");
        let store = CredentialStore::file_only(&path);

        store.save_refresh_token("fresh").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "STRAVA_CLIENT_ID=123\nSTRAVA_CLIENT_SECRET=shh\nSTRAVA_REFRESH_TOKEN=fresh\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_refresh_token_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = write_env(&temp, "STRAVA_REFRESH_TOKEN=old\n");
        CredentialStore::file_only(&path)
            .save_refresh_token("new")
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_replace_env_line_only_first_match() {
        let out = replace_env_line("A=1\nA=2\n", "A", "9");
        assert_eq!(out, "A=9\nA=2\n");
    }

    #[test]
    fn test_replace_env_line_ignores_prefix_collisions() {
        let out = replace_env_line("STRAVA_REFRESH_TOKEN_OLD=x\n", REFRESH_TOKEN_KEY, "y");
        assert_eq!(out, "STRAVA_REFRESH_TOKEN_OLD=x\nSTRAVA_REFRESH_TOKEN=y\n");
    }
}
