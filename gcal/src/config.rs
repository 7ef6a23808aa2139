// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// OAuth client credentials used to mint access tokens.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct GoogleAuth {
    /// OAuth client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Long-lived refresh token.
    #[serde(default)]
    pub refresh_token: String,
    /// Access token to start with; refreshed on first expiry.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Google Calendar configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GoogleConfig {
    /// Base URL of the Calendar v3 API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Calendar to operate on.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// OAuth token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Credentials.
    #[serde(default)]
    pub auth: GoogleAuth,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("calsync-gcal/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            calendar_id: default_calendar_id(),
            token_url: default_token_url(),
            auth: GoogleAuth::default(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
