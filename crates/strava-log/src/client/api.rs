//! Strava API client
//!
//! Two calls are needed for a sync: exchanging the refresh token for an
//! access token, and listing the athlete's activities after a cursor.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::client::tokens::{AccessToken, ClientCredentials};
use crate::error::{Result, StravaError};
use crate::models::Activity;

/// Default Strava host
const STRAVA_BASE_URL: &str = "https://www.strava.com";

const TOKEN_PATH: &str = "/api/v3/oauth/token";
const ACTIVITIES_PATH: &str = "/api/v3/athlete/activities";

/// Maximum page size accepted by the activities endpoint for our use
pub const PAGE_SIZE: usize = 100;

/// Per-request timeout
const REQUEST_TIMEOUT_SECS: u64 = 15;

const API_USER_AGENT: &str = concat!("strava-log/", env!("CARGO_PKG_VERSION"));

/// Strava API client
pub struct StravaClient {
    client: Client,
    base_url: String,
}

impl StravaClient {
    /// Create a client for the public Strava API
    pub fn new() -> Result<Self> {
        Self::new_with_base_url(STRAVA_BASE_URL)
    }

    /// Create a new API client with a custom base URL (for testing)
    #[doc(hidden)]
    pub fn new_with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the full URL for a given path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers with authorization
    fn build_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        let auth = HeaderValue::from_str(&token.authorization_header())
            .map_err(|_| StravaError::invalid_response("Access token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    /// Exchange a refresh token for a short-lived access token
    ///
    /// Any non-200 response is an authentication failure carrying the status
    /// and body returned by Strava.
    pub async fn refresh_access_token(&self, credentials: &ClientCredentials) -> Result<AccessToken> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
        ];

        let response = self
            .client
            .post(self.build_url(TOKEN_PATH))
            .header(USER_AGENT, API_USER_AGENT)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(StravaError::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            StravaError::invalid_response(format!("Failed to parse token response: {}", e))
        })
    }

    /// Fetch one page (1-based) of activities started after `after` (epoch seconds)
    pub async fn fetch_page(&self, token: &AccessToken, after: i64, page: u32) -> Result<Vec<Activity>> {
        let response = self
            .client
            .get(self.build_url(ACTIVITIES_PATH))
            .headers(self.build_headers(token)?)
            .query(&[
                ("after", after.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let response = self.handle_response_status(response).await?;
        let activities: Vec<Activity> = response.json().await.map_err(|e| {
            StravaError::invalid_response(format!("Failed to parse activities page {}: {}", page, e))
        })?;

        debug!(page, count = activities.len(), "fetched activity page");
        Ok(activities)
    }

    /// Fetch every activity after `after`, following pages until a short or
    /// empty page
    ///
    /// Each page is handed to `on_page` as soon as it arrives, so records from
    /// earlier pages are kept even if a later page fails. Returns the total
    /// number of records fetched.
    pub async fn fetch_activities_after<F>(
        &self,
        token: &AccessToken,
        after: i64,
        mut on_page: F,
    ) -> Result<usize>
    where
        F: FnMut(Vec<Activity>),
    {
        let mut total = 0;
        let mut page = 1;
        loop {
            let batch = self.fetch_page(token, after, page).await?;
            let done = is_last_page(batch.len());
            total += batch.len();
            on_page(batch);
            if done {
                break;
            }
            page += 1;
        }
        Ok(total)
    }

    /// Handle response status codes and convert to errors
    async fn handle_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        match status {
            s if s.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(StravaError::NotAuthenticated),
            StatusCode::TOO_MANY_REQUESTS => Err(StravaError::RateLimited),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(StravaError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

/// Whether a page of `len` records ends the listing
pub fn is_last_page(len: usize) -> bool {
    len < PAGE_SIZE
}
