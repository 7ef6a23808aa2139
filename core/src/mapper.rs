// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion of event drafts into the body the remote calendar expects.

use jiff::SignedDuration;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::config::Owner;
use crate::error::SyncError;
use crate::interval::Interval;
use crate::types::EventDraft;

/// Duration applied when a draft has no end.
pub const DEFAULT_DURATION: SignedDuration = SignedDuration::from_hours(1);

/// Event body as sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBody {
    /// Event title.
    pub summary: String,
    /// Start in civil time plus zone.
    pub start: WireDateTime,
    /// End in civil time plus zone.
    pub end: WireDateTime,
    /// Free-text description holding the decision trail.
    pub description: String,
    /// Free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Attendees with a resolvable address.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<WireAttendee>,
}

/// A civil date-time tagged with an IANA zone name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDateTime {
    /// Civil date-time.
    pub date_time: DateTime,
    /// IANA zone name.
    pub time_zone: String,
}

/// An attendee entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAttendee {
    /// Contact address.
    pub email: String,
}

/// Converts a draft into a wire body.
///
/// The end defaults to one hour after the start. The owner, named either by
/// name or address, becomes an attendee with the owner's address; every other
/// participant is listed by name in the description only.
///
/// # Errors
///
/// Returns [`SyncError::InvalidEvent`] unless start is strictly before end,
/// and [`SyncError::Config`] if `tz` has no IANA name to label the times with.
pub fn to_wire_body(
    event: &EventDraft,
    tz: &TimeZone,
    owner: &Owner,
) -> Result<WireBody, SyncError> {
    let end = effective_end(event)?;
    if event.start >= end {
        return Err(SyncError::InvalidEvent(format!(
            "'{}' ends ({end}) before it starts ({})",
            event.title, event.start
        )));
    }

    let zone = tz
        .iana_name()
        .ok_or_else(|| SyncError::Config("time zone has no IANA name".into()))?
        .to_string();
    let (owner_present, others) = split_attendees(&event.attendees, owner);
    let attendees = if owner_present {
        vec![WireAttendee {
            email: owner.email.clone(),
        }]
    } else {
        Vec::new()
    };

    tracing::debug!(title = %event.title, start = %event.start, %end, "mapped event body");
    Ok(WireBody {
        summary: event.title.clone(),
        start: WireDateTime {
            date_time: event.start,
            time_zone: zone.clone(),
        },
        end: WireDateTime {
            date_time: end,
            time_zone: zone,
        },
        description: build_description(event, &others),
        location: event.location.clone().filter(|l| !l.is_empty()),
        attendees,
    })
}

/// The instants a draft covers in the given zone, after applying the default
/// duration.
///
/// # Errors
///
/// Returns [`SyncError::InvalidEvent`] if the civil times cannot be placed in
/// the zone or start is not strictly before end.
pub fn draft_interval(event: &EventDraft, tz: &TimeZone) -> Result<Interval, SyncError> {
    let end = effective_end(event)?;
    let to_instant = |dt: DateTime| {
        dt.to_zoned(tz.clone())
            .map(|z| z.timestamp())
            .map_err(|e| SyncError::InvalidEvent(format!("'{}': {e}", event.title)))
    };
    let (start, end) = (to_instant(event.start)?, to_instant(end)?);
    Interval::new(start, end).ok_or_else(|| {
        SyncError::InvalidEvent(format!(
            "'{}' ends ({end}) before it starts ({start})",
            event.title
        ))
    })
}

fn effective_end(event: &EventDraft) -> Result<DateTime, SyncError> {
    match event.end {
        Some(end) => Ok(end),
        None => event
            .start
            .checked_add(DEFAULT_DURATION)
            .map_err(|e| SyncError::InvalidEvent(format!("'{}': {e}", event.title))),
    }
}

/// Whether the owner is among the attendees, and everyone else in order.
fn split_attendees<'a>(attendees: &'a [String], owner: &Owner) -> (bool, Vec<&'a str>) {
    let mut owner_present = false;
    let mut others = Vec::new();
    for name in attendees {
        if owner.is(name) {
            owner_present = true;
        } else {
            others.push(name.as_str());
        }
    }
    (owner_present, others)
}

fn build_description(event: &EventDraft, others: &[&str]) -> String {
    let mut sections = Vec::new();
    if let Some(reasoning) = event.reasoning.as_deref().filter(|r| !r.is_empty()) {
        sections.push(format!("Reasoning: {reasoning}"));
    }
    if !event.assumptions.is_empty() {
        sections.push(format!("Assumptions: {}", event.assumptions.join("; ")));
    }
    if !others.is_empty() {
        sections.push(format!("Other attendees: {}", others.join(", ")));
    }
    sections.join("\n")
}
