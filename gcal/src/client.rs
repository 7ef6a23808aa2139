// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Google Calendar backend.

use async_trait::async_trait;
use calsync_core::{CalendarBackend, EventId, EventPage, Interval, RemoteError, WireBody};
use jiff::tz::TimeZone;
use reqwest::{Method, Url};

use crate::config::GoogleConfig;
use crate::error::GoogleError;
use crate::http::HttpClient;
use crate::types::{EventsListResponse, GoogleEvent};

const PAGE_SIZE: &str = "250";

/// Calendar v3 backend over one calendar.
///
/// # Example
///
/// ```ignore
/// use calsync_gcal::{GoogleCalendar, GoogleConfig};
///
/// let mut config = GoogleConfig::default();
/// config.auth.refresh_token = "1//0g...".to_string();
/// let backend = GoogleCalendar::new(config)?;
/// ```
#[derive(Debug)]
pub struct GoogleCalendar {
    http: HttpClient,
    events_url: Url,
}

impl GoogleCalendar {
    /// Creates a backend for the configured calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar id is empty, the base URL is invalid,
    /// or HTTP client creation fails.
    pub fn new(config: GoogleConfig) -> Result<Self, GoogleError> {
        if config.calendar_id.trim().is_empty() {
            return Err(GoogleError::Config("calendar_id must not be empty".into()));
        }
        let mut events_url = Url::parse(&config.base_url)
            .map_err(|e| GoogleError::Url(format!("{}: {e}", config.base_url)))?;
        events_url
            .path_segments_mut()
            .map_err(|()| GoogleError::Url(format!("{} cannot be a base", config.base_url)))?
            .pop_if_empty()
            .extend(["calendars", config.calendar_id.as_str(), "events"]);
        tracing::debug!(url = %events_url, "configured calendar");

        let http = HttpClient::new(config)?;
        Ok(Self { http, events_url })
    }

    fn event_url(&self, id: &EventId) -> Result<Url, GoogleError> {
        let mut url = self.events_url.clone();
        url.path_segments_mut()
            .map_err(|()| GoogleError::Url(format!("cannot append event id {id}")))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl CalendarBackend for GoogleCalendar {
    async fn insert(&self, body: &WireBody) -> Result<EventId, RemoteError> {
        let req = self
            .http
            .build_request(Method::POST, self.events_url.clone())
            .await
            .json(body);
        let created: GoogleEvent = self.http.execute_json(req).await?;
        if created.id.is_empty() {
            return Err(GoogleError::InvalidResponse("created event has no id".into()).into());
        }
        Ok(EventId::new(created.id))
    }

    async fn list_page(
        &self,
        window: &Interval,
        page_token: Option<&str>,
    ) -> Result<EventPage, RemoteError> {
        let mut query = vec![
            ("timeMin", window.start().to_string()),
            ("timeMax", window.end().to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", PAGE_SIZE.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let req = self
            .http
            .build_request(Method::GET, self.events_url.clone())
            .await
            .query(&query);
        let page: EventsListResponse = self.http.execute_json(req).await?;

        let tz = page
            .time_zone
            .as_deref()
            .and_then(|name| TimeZone::get(name).ok())
            .unwrap_or(TimeZone::UTC);
        let mut events = Vec::with_capacity(page.items.len());
        for item in page.items {
            if item.is_cancelled() {
                continue;
            }
            let id = item.id.clone();
            match item.into_remote(&tz) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(%id, error = %e, "skipping unreadable event"),
            }
        }
        tracing::debug!(count = events.len(), more = page.next_page_token.is_some(), "listed page");
        Ok(EventPage {
            events,
            next_page_token: page.next_page_token,
        })
    }

    async fn update(&self, id: &EventId, body: &WireBody) -> Result<(), RemoteError> {
        let url = self.event_url(id)?;
        let req = self.http.build_request(Method::PUT, url).await.json(body);
        self.http.execute(req).await?;
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<(), RemoteError> {
        let url = self.event_url(id)?;
        let req = self.http.build_request(Method::DELETE, url).await;
        self.http.execute(req).await?;
        Ok(())
    }

    async fn refresh_credentials(&self) -> Result<(), RemoteError> {
        self.http.refresh_token().await
    }
}
