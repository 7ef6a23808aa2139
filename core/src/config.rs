// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use jiff::SignedDuration;
use jiff::tz::TimeZone;

use crate::error::SyncError;

/// The name of the application.
pub const APP_NAME: &str = "calsync";

/// Synchronization settings.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SyncConfig {
    /// Days ahead of "now" covered by the calendar context.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// IANA zone that action times are expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// The calendar owner.
    #[serde(default)]
    pub owner: Owner,

    /// Retry behavior for remote calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Title and time search used when a reference cannot be resolved.
    #[serde(default)]
    pub search: SearchConfig,
}

impl SyncConfig {
    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] describing the first offending value.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.owner.email.trim().is_empty() {
            return Err(SyncError::Config("owner.email is required".into()));
        }
        if self.window_days == 0 {
            return Err(SyncError::Config("window_days must be at least 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(SyncError::Config("retry.max_attempts must be at least 1".into()));
        }
        self.time_zone()?;
        Ok(())
    }

    /// Resolves the configured zone.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the name is not a known IANA zone.
    pub fn time_zone(&self) -> Result<TimeZone, SyncError> {
        TimeZone::get(&self.timezone)
            .map_err(|e| SyncError::Config(format!("unknown timezone '{}': {e}", self.timezone)))
    }

    /// The context window length.
    #[must_use]
    pub fn window(&self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.window_days) * 24)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            timezone: default_timezone(),
            owner: Owner::default(),
            retry: RetryConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// The person whose calendar is being synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Owner {
    /// Display name, as the upstream step writes it.
    #[serde(default)]
    pub name: String,
    /// Contact address used as attendee.
    #[serde(default)]
    pub email: String,
}

impl Owner {
    /// Whether `attendee` names the owner, by name or address, ignoring case.
    #[must_use]
    pub fn is(&self, attendee: &str) -> bool {
        let attendee = attendee.trim();
        !attendee.is_empty()
            && [&self.name, &self.email]
                .iter()
                .any(|s| !s.is_empty() && s.eq_ignore_ascii_case(attendee))
    }
}

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct RetryConfig {
    /// Attempts per operation, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; doubled after every attempt.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    /// The base backoff delay.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Title and time search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct SearchConfig {
    /// Hours listed on either side of the action's time range.
    #[serde(default = "default_search_window_hours")]
    pub window_hours: u32,
    /// Largest start distance accepted for a non-overlapping match.
    #[serde(default = "default_nearby_minutes")]
    pub nearby_minutes: u32,
}

impl SearchConfig {
    /// Padding around the action's range when listing.
    #[must_use]
    pub fn padding(&self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.window_hours))
    }

    /// Tolerance for a nearby start.
    #[must_use]
    pub fn tolerance(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.nearby_minutes))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window_hours: default_search_window_hours(),
            nearby_minutes: default_nearby_minutes(),
        }
    }
}

const fn default_window_days() -> u32 {
    14
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_search_window_hours() -> u32 {
    24
}

const fn default_nearby_minutes() -> u32 {
    60
}
