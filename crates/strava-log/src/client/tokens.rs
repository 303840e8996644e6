use serde::{Deserialize, Serialize};

/// Client credentials and long-lived refresh token used to mint access tokens
#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Response from the Strava token endpoint
///
/// Strava may rotate the refresh token; when it does, the new one must be
/// persisted or the next refresh will fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: i64,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AccessToken {
    /// Returns the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// The rotated refresh token, if it differs from `current`
    pub fn rotated_refresh_token(&self, current: &str) -> Option<&str> {
        self.refresh_token
            .as_deref()
            .filter(|token| !token.is_empty() && *token != current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(refresh: Option<&str>, expires_at: i64) -> AccessToken {
        AccessToken {
            access_token: "access123".to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_at,
            expires_in: 21600,
            token_type: "Bearer".to_string(),
        }
    }

    #[test]
    fn test_authorization_header() {
        assert_eq!(
            token(None, 0).authorization_header(),
            "Bearer access123"
        );
    }

    #[test]
    fn test_rotated_refresh_token() {
        assert_eq!(token(Some("new"), 0).rotated_refresh_token("old"), Some("new"));
        assert_eq!(token(Some("old"), 0).rotated_refresh_token("old"), None);
        assert_eq!(token(None, 0).rotated_refresh_token("old"), None);
        assert_eq!(token(Some(""), 0).rotated_refresh_token("old"), None);
    }

    #[test]
    fn test_deserialize_token_response() {
        let json = r#"{
            "token_type": "Bearer",
            "access_token": "a9b723",
            "expires_at": 1568775134,
            "expires_in": 20566,
            "refresh_token": "b5c569"
        }"#;
        let token: AccessToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "a9b723");
        assert_eq!(token.refresh_token.as_deref(), Some("b5c569"));
        assert_eq!(token.expires_at, 1568775134);
    }

    #[test]
    fn test_deserialize_minimal_token_response() {
        let token: AccessToken = serde_json::from_str(r#"{"access_token": "x"}"#).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.refresh_token.is_none());
    }
}
