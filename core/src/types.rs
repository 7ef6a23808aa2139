// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use jiff::Timestamp;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Opaque event identifier assigned by the remote calendar.
///
/// Never shown to the upstream decision step; see [`crate::IdentifierMap`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new `EventId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for EventId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An event as it exists on the remote calendar.
///
/// Snapshot value: it is re-fetched, never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    /// Opaque remote identifier.
    pub id: EventId,
    /// Event title (summary).
    pub title: String,
    /// Start instant.
    pub start: Timestamp,
    /// End instant.
    pub end: Timestamp,
    /// Free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RemoteEvent {
    /// Whether the title equals `title`, ignoring case.
    #[must_use]
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Whether the event shares any instant with `range`.
    #[must_use]
    pub fn overlaps(&self, range: &Interval) -> bool {
        crate::interval::overlaps(self.start, self.end, range.start(), range.end())
    }
}

/// One page of a remote listing.
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    /// Events on this page.
    pub events: Vec<RemoteEvent>,
    /// Token for the next page, `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Point-in-time read of remote events within a bounded window.
///
/// Events are ordered by start; an opaque id appears at most once. A
/// deserialized snapshot is normalised the same way, so it numbers its events
/// exactly as the snapshot it was written from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct EventSnapshot {
    window: Option<Interval>,
    events: Vec<RemoteEvent>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    window: Option<Interval>,
    #[serde(default)]
    events: Vec<RemoteEvent>,
}

impl From<RawSnapshot> for EventSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        Self::new(raw.window, raw.events)
    }
}

impl EventSnapshot {
    /// Creates a snapshot of `events` read from `window`.
    #[must_use]
    pub fn new(window: Option<Interval>, events: Vec<RemoteEvent>) -> Self {
        let mut seen = HashSet::new();
        let mut events: Vec<_> = events
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.id.clone());
                if !fresh {
                    tracing::debug!(id = %e.id, "dropping repeated event id from snapshot");
                }
                fresh
            })
            .collect();
        events.sort_by_key(|e| e.start); // stable: equal starts keep remote order
        Self { window, events }
    }

    /// A snapshot with no events, used when no context could be fetched.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The window this snapshot was read from, if any.
    #[must_use]
    pub const fn window(&self) -> Option<&Interval> {
        self.window.as_ref()
    }

    /// Events in snapshot order.
    #[must_use]
    pub fn events(&self) -> &[RemoteEvent] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the snapshot holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Looks up an event by its opaque id.
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&RemoteEvent> {
        self.events.iter().find(|e| &e.id == id)
    }
}

/// The operation decided upstream for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Create a new event.
    #[default]
    Create,
    /// Update an existing event.
    Update,
    /// Delete an existing event.
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Upstream confidence in an extracted event. Pass-through only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// High confidence.
    High,
    /// Medium confidence.
    Medium,
    /// Low confidence.
    Low,
}

/// Event fields of an action, in civil time of the configured zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event title.
    pub title: String,

    /// Start, in the configured time zone.
    #[serde(alias = "start_time")]
    pub start: DateTime,

    /// End, in the configured time zone; one hour after start when absent.
    #[serde(default, alias = "end_time")]
    pub end: Option<DateTime>,

    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,

    /// Participant names as written upstream.
    #[serde(default)]
    pub attendees: Vec<String>,

    /// Upstream confidence. Carried through for observability.
    #[serde(default)]
    pub confidence: Option<Confidence>,

    /// Upstream rationale. Carried through for observability.
    #[serde(default)]
    pub reasoning: Option<String>,

    /// Upstream assumptions. Carried through for observability.
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl EventDraft {
    /// Creates a draft with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, start: DateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end: None,
            location: None,
            attendees: Vec::new(),
            confidence: None,
            reasoning: None,
            assumptions: Vec::new(),
        }
    }

    /// Sets the end.
    #[must_use]
    pub fn with_end(mut self, end: DateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the attendees.
    #[must_use]
    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }
}

/// A decided operation handed over by the extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// What to do.
    #[serde(default)]
    pub action: ActionKind,

    /// The event the action is about.
    #[serde(flatten)]
    pub event: EventDraft,

    /// Integer reference into the batch's identifier map.
    #[serde(default, alias = "existing_event_id")]
    pub existing_reference: Option<u32>,
}

impl ActionRequest {
    /// A create action.
    #[must_use]
    pub const fn create(event: EventDraft) -> Self {
        Self {
            action: ActionKind::Create,
            event,
            existing_reference: None,
        }
    }

    /// An update action, optionally pointing at a snapshot reference.
    #[must_use]
    pub const fn update(event: EventDraft, reference: Option<u32>) -> Self {
        Self {
            action: ActionKind::Update,
            event,
            existing_reference: reference,
        }
    }

    /// A delete action, optionally pointing at a snapshot reference.
    #[must_use]
    pub const fn delete(event: EventDraft, reference: Option<u32>) -> Self {
        Self {
            action: ActionKind::Delete,
            event,
            existing_reference: reference,
        }
    }
}
