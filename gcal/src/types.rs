// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar v3 wire types, reduced to the fields the engine reads.

use calsync_core::{EventId, RemoteEvent};
use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::Deserialize;

use crate::error::GoogleError;

/// Start or end of an event: either `dateTime` or, for all-day events, `date`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// RFC 3339 instant.
    #[serde(default)]
    pub date_time: Option<String>,
    /// Calendar date of an all-day event.
    #[serde(default)]
    pub date: Option<String>,
    /// Zone the event was written in.
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// The instant this time denotes; all-day dates start at midnight in `tz`.
    pub fn instant(&self, tz: &TimeZone) -> Result<Timestamp, GoogleError> {
        if let Some(dt) = &self.date_time {
            return dt
                .parse::<Timestamp>()
                .map_err(|e| GoogleError::InvalidResponse(format!("dateTime '{dt}': {e}")));
        }
        if let Some(date) = &self.date {
            return date
                .parse::<Date>()
                .and_then(|d| d.to_zoned(tz.clone()))
                .map(|z| z.timestamp())
                .map_err(|e| GoogleError::InvalidResponse(format!("date '{date}': {e}")));
        }
        Err(GoogleError::InvalidResponse(
            "neither dateTime nor date present".to_string(),
        ))
    }
}

/// An event resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    /// Opaque event id.
    #[serde(default)]
    pub id: String,
    /// `confirmed`, `tentative` or `cancelled`.
    #[serde(default)]
    pub status: Option<String>,
    /// Title.
    #[serde(default)]
    pub summary: Option<String>,
    /// Location.
    #[serde(default)]
    pub location: Option<String>,
    /// Start.
    #[serde(default)]
    pub start: Option<EventTime>,
    /// End.
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl GoogleEvent {
    /// Whether the event was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    /// Converts to the engine's event, resolving all-day dates in `tz`.
    pub fn into_remote(self, tz: &TimeZone) -> Result<RemoteEvent, GoogleError> {
        let missing =
            || GoogleError::InvalidResponse(format!("event {} has no start or end", self.id));
        let start = self.start.as_ref().ok_or_else(missing)?.instant(tz)?;
        let end = self.end.as_ref().ok_or_else(missing)?.instant(tz)?;
        Ok(RemoteEvent {
            id: EventId::new(self.id),
            title: self.summary.unwrap_or_default(),
            start,
            end,
            location: self.location.filter(|l| !l.is_empty()),
        })
    }
}

/// A page of `events.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsListResponse {
    /// Events on this page.
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    /// Token of the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// The calendar's zone.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Response of the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// New bearer token.
    pub access_token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}
