use std::path::PathBuf;

use thiserror::Error;

/// Main error type for strava-log
#[derive(Error, Debug)]
pub enum StravaError {
    #[error("Missing Strava credentials (expected STRAVA_CLIENT_ID, STRAVA_CLIENT_SECRET and STRAVA_REFRESH_TOKEN in {})", .env_file.display())]
    MissingCredentials { env_file: PathBuf },

    #[error("Failed to refresh Strava access token (status {status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("Access token rejected by Strava")]
    NotAuthenticated,

    #[error("Rate limited. Please wait before retrying.")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidDateFormat(String),
}

pub type Result<T> = std::result::Result<T, StravaError>;

impl StravaError {
    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid response error from a message
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

/// Render an error for the terminal, with a hint where the operator can act on it
pub fn format_user_error(err: &StravaError) -> String {
    match err {
        StravaError::MissingCredentials { env_file } => format!(
            "{}\n  Expected .env at: {}",
            err,
            env_file.display()
        ),
        StravaError::Authentication { .. } | StravaError::NotAuthenticated => format!(
            "{}\n  Check STRAVA_REFRESH_TOKEN; it may have been revoked.",
            err
        ),
        StravaError::RateLimited => {
            format!("{}\n  Strava allows 100 requests per 15 minutes.", err)
        }
        _ => err.to_string(),
    }
}
