// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;

use crate::error::{ErrorKind, SyncError};
use crate::types::{ActionKind, ActionRequest, EventId, RemoteEvent};

/// Result tag of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A new event was created.
    Created,
    /// An existing event was replaced.
    Updated,
    /// An event was deleted, or was already gone.
    Deleted,
    /// Creation was skipped because the event already exists.
    SkippedDuplicate,
    /// No event could be found to update or delete.
    SkippedNotFound,
    /// The action failed; see the outcome's error.
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::SkippedDuplicate => "skipped_duplicate",
            Self::SkippedNotFound => "skipped_not_found",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Which fallback path produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// The target was located by title and time instead of by reference.
    TitleTimeSearch,
    /// The update target had vanished, so the event was created anew.
    RecreatedVanishedEvent,
    /// The delete target was already gone.
    AlreadyDeleted,
}

/// The snapshot or remote event an action was matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedEvent {
    /// Title of the matched event.
    pub title: String,
    /// Start of the matched event.
    pub start: Timestamp,
}

impl From<&RemoteEvent> for MatchedEvent {
    fn from(event: &RemoteEvent) -> Self {
        Self {
            title: event.title.clone(),
            start: event.start,
        }
    }
}

/// Error detail of an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeError {
    /// Error class.
    pub kind: ErrorKind,
    /// Human readable message.
    pub message: String,
}

impl From<&SyncError> for OutcomeError {
    fn from(err: &SyncError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// What happened to one action of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Position of the action in the batch.
    pub index: usize,
    /// The action attempted.
    pub action: ActionKind,
    /// Title of the action's event.
    pub title: String,
    /// Integer reference the action supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<u32>,
    /// Opaque id acted upon or created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    /// Result tag.
    pub status: OutcomeStatus,
    /// The existing event the action was matched against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchedEvent>,
    /// Fallback path taken, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
    /// Error detail; always present when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl SyncOutcome {
    pub(crate) fn new(index: usize, request: &ActionRequest) -> Self {
        Self {
            index,
            action: request.action,
            title: request.event.title.clone(),
            reference: request.existing_reference,
            event_id: None,
            status: OutcomeStatus::Failed,
            matched: None,
            fallback: None,
            error: None,
        }
    }
}

/// An existing event overlapping a newly created one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictingEvent {
    /// Integer reference of the event in the batch's snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<u32>,
    /// Title of the existing event.
    pub title: String,
    /// Start of the existing event.
    pub start: Timestamp,
    /// End of the existing event.
    pub end: Timestamp,
}

/// Scheduling overlap noted while creating an event. Never blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Position of the creating action in the batch.
    pub index: usize,
    /// Title of the created event.
    pub title: String,
    /// Opaque id of the created event.
    pub event_id: EventId,
    /// Start of the created event.
    pub start: Timestamp,
    /// End of the created event.
    pub end: Timestamp,
    /// Overlapping snapshot events, in snapshot order.
    pub overlapping: Vec<ConflictingEvent>,
}

/// Number of outcomes per result tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    /// See [`OutcomeStatus::Created`].
    pub created: usize,
    /// See [`OutcomeStatus::Updated`].
    pub updated: usize,
    /// See [`OutcomeStatus::Deleted`].
    pub deleted: usize,
    /// See [`OutcomeStatus::SkippedDuplicate`].
    pub skipped_duplicate: usize,
    /// See [`OutcomeStatus::SkippedNotFound`].
    pub skipped_not_found: usize,
    /// See [`OutcomeStatus::Failed`].
    pub failed: usize,
}

impl OutcomeCounts {
    fn slot(&mut self, status: OutcomeStatus) -> &mut usize {
        match status {
            OutcomeStatus::Created => &mut self.created,
            OutcomeStatus::Updated => &mut self.updated,
            OutcomeStatus::Deleted => &mut self.deleted,
            OutcomeStatus::SkippedDuplicate => &mut self.skipped_duplicate,
            OutcomeStatus::SkippedNotFound => &mut self.skipped_not_found,
            OutcomeStatus::Failed => &mut self.failed,
        }
    }

    /// Outcomes tagged `status`.
    #[must_use]
    pub const fn get(&self, status: OutcomeStatus) -> usize {
        match status {
            OutcomeStatus::Created => self.created,
            OutcomeStatus::Updated => self.updated,
            OutcomeStatus::Deleted => self.deleted,
            OutcomeStatus::SkippedDuplicate => self.skipped_duplicate,
            OutcomeStatus::SkippedNotFound => self.skipped_not_found,
            OutcomeStatus::Failed => self.failed,
        }
    }

    /// Sum over every tag.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created
            + self.updated
            + self.deleted
            + self.skipped_duplicate
            + self.skipped_not_found
            + self.failed
    }
}

/// Aggregated result of one batch.
///
/// Holds exactly one outcome per submitted action, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Outcomes per result tag.
    pub counts: OutcomeCounts,
    /// One outcome per action.
    pub outcomes: Vec<SyncOutcome>,
    /// Overlaps noted while creating.
    pub conflicts: Vec<Conflict>,
}

impl BatchResult {
    pub(crate) fn record(&mut self, outcome: SyncOutcome) {
        *self.counts.slot(outcome.status) += 1;
        self.outcomes.push(outcome);
    }

    /// Number of outcomes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether any action failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }

    /// Whether any created event overlaps an existing one.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Whether any action failed on credentials, a signal to stop further batches.
    #[must_use]
    pub fn auth_failed(&self) -> bool {
        self.outcomes.iter().any(|o| {
            o.status == OutcomeStatus::Failed
                && o.error.as_ref().is_some_and(|e| e.kind == ErrorKind::AuthFailed)
        })
    }
}
