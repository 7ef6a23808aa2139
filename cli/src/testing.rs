// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Backends for exercising the commands without a remote calendar.

use std::sync::Mutex;

use calsync_core::{
    CalendarBackend, EventId, EventPage, Interval, Owner, RemoteError, RemoteEvent, RetryConfig,
    SyncConfig, Synchronizer, WireBody, WireDateTime,
};
use jiff::{SignedDuration, Timestamp, tz::TimeZone};

/// Every call fails as unavailable.
#[derive(Debug)]
pub struct Offline;

#[async_trait::async_trait]
impl CalendarBackend for Offline {
    async fn insert(&self, _: &WireBody) -> Result<EventId, RemoteError> {
        Err(RemoteError::unavailable("offline"))
    }

    async fn list_page(&self, _: &Interval, _: Option<&str>) -> Result<EventPage, RemoteError> {
        Err(RemoteError::unavailable("offline"))
    }

    async fn update(&self, _: &EventId, _: &WireBody) -> Result<(), RemoteError> {
        Err(RemoteError::unavailable("offline"))
    }

    async fn delete(&self, _: &EventId) -> Result<(), RemoteError> {
        Err(RemoteError::unavailable("offline"))
    }

    async fn refresh_credentials(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}

/// A calendar held in memory.
#[derive(Debug, Default)]
pub struct Memory {
    events: Mutex<Vec<RemoteEvent>>,
}

impl Memory {
    pub fn new(events: impl IntoIterator<Item = RemoteEvent>) -> Self {
        Self {
            events: Mutex::new(events.into_iter().collect()),
        }
    }

    /// Adds an event behind the engine's back.
    pub fn add(&self, event: RemoteEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn titles(&self) -> Vec<String> {
        let events = self.events.lock().unwrap();
        events.iter().map(|e| e.title.clone()).collect()
    }
}

fn instant(time: &WireDateTime) -> Timestamp {
    let tz = TimeZone::get(&time.time_zone).unwrap();
    time.date_time.to_zoned(tz).unwrap().timestamp()
}

#[async_trait::async_trait]
impl CalendarBackend for Memory {
    async fn insert(&self, body: &WireBody) -> Result<EventId, RemoteError> {
        let mut events = self.events.lock().unwrap();
        let id = EventId::new(format!("created-{}", events.len() + 1));
        events.push(RemoteEvent {
            id: id.clone(),
            title: body.summary.clone(),
            start: instant(&body.start),
            end: instant(&body.end),
            location: body.location.clone(),
        });
        Ok(id)
    }

    async fn list_page(
        &self,
        window: &Interval,
        _: Option<&str>,
    ) -> Result<EventPage, RemoteError> {
        let events = self.events.lock().unwrap();
        Ok(EventPage {
            events: events.iter().filter(|e| e.overlaps(window)).cloned().collect(),
            next_page_token: None,
        })
    }

    async fn update(&self, id: &EventId, body: &WireBody) -> Result<(), RemoteError> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| RemoteError::not_found(id.to_string()))?;
        event.title.clone_from(&body.summary);
        event.start = instant(&body.start);
        event.end = instant(&body.end);
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<(), RemoteError> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| &e.id != id);
        if events.len() == before {
            return Err(RemoteError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn refresh_credentials(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}

pub fn event(id: &str, title: &str, start: &str, minutes: i64) -> RemoteEvent {
    let start: Timestamp = start.parse().unwrap();
    RemoteEvent {
        id: EventId::from(id),
        title: title.to_string(),
        start,
        end: start.checked_add(SignedDuration::from_mins(minutes)).unwrap(),
        location: None,
    }
}

pub fn config() -> SyncConfig {
    SyncConfig {
        owner: Owner {
            name: "Dana Whitfield".to_string(),
            email: "dana@example.com".to_string(),
        },
        retry: RetryConfig {
            max_attempts: 2,
            base_delay_ms: 0,
        },
        ..SyncConfig::default()
    }
}

pub fn synchronizer(memory: &Memory) -> Synchronizer<&Memory> {
    Synchronizer::new(memory, config()).unwrap()
}

pub fn offline() -> Synchronizer<Offline> {
    Synchronizer::new(Offline, config()).unwrap()
}
