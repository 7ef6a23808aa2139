// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Small integer references over a snapshot of remote events.
//!
//! Opaque remote ids are long random strings that a language model copies
//! back unreliably. The upstream step only ever sees `1, 2, 3, ...`, and
//! this map translates them back for the duration of one batch.

use bimap::BiBTreeMap;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::error::SyncError;
use crate::types::{EventId, EventSnapshot, RemoteEvent};

/// Bidirectional map between dense references (`1..=n`) and opaque ids.
///
/// Only valid for the snapshot it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMap {
    map: BiBTreeMap<u32, EventId>,
}

impl IdentifierMap {
    /// Assigns `1, 2, 3, ...` to the snapshot's events in snapshot order.
    #[must_use]
    pub fn build(snapshot: &EventSnapshot) -> Self {
        let mut map = BiBTreeMap::new();
        for (reference, event) in (1..).zip(snapshot.events()) {
            map.insert(reference, event.id.clone());
        }
        tracing::debug!(count = map.len(), "assigned snapshot references");
        Self { map }
    }

    /// Resolves a reference back to the opaque id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ResolutionFailed`] if the reference was never assigned.
    pub fn resolve(&self, reference: u32) -> Result<&EventId, SyncError> {
        self.map
            .get_by_left(&reference)
            .ok_or(SyncError::ResolutionFailed(reference))
    }

    /// The reference assigned to an opaque id, if any.
    #[must_use]
    pub fn reference_of(&self, id: &EventId) -> Option<u32> {
        self.map.get_by_right(id).copied()
    }

    /// Number of assigned references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no reference was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(reference, id)` pairs in ascending reference order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &EventId)> {
        self.map.iter().map(|(&reference, id)| (reference, id))
    }
}

/// A snapshot remapped for the upstream decision step.
#[derive(Debug, Clone, Default)]
pub struct CalendarContext {
    ids: IdentifierMap,
    lines: Vec<String>,
}

impl CalendarContext {
    /// Builds the reference map and the one-line-per-event rendering.
    #[must_use]
    pub fn build(snapshot: &EventSnapshot, tz: &TimeZone) -> Self {
        let ids = IdentifierMap::build(snapshot);
        let lines = (1..)
            .zip(snapshot.events())
            .map(|(reference, event)| format_line(reference, event, tz))
            .collect();
        Self { ids, lines }
    }

    /// The reference map.
    #[must_use]
    pub const fn ids(&self) -> &IdentifierMap {
        &self.ids
    }

    /// Rendered lines, in snapshot order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rendered text, one event per line.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of events in the context.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lines.len()
    }
}

/// `[N] Title | START - END | Location`
fn format_line(reference: u32, event: &RemoteEvent, tz: &TimeZone) -> String {
    let title = if event.title.is_empty() {
        "(No title)"
    } else {
        event.title.as_str()
    };
    let mut line = format!(
        "[{reference}] {title} | {} - {}",
        civil(event.start, tz),
        civil(event.end, tz)
    );
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        line.push_str(" | ");
        line.push_str(location);
    }
    line
}

fn civil(ts: Timestamp, tz: &TimeZone) -> String {
    tz.to_datetime(ts).to_string()
}
