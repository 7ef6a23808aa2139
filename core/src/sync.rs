// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Batch reconciliation of decided actions against the remote calendar.
//!
//! A [`Batch`] is built from one snapshot and consumed by [`Batch::apply`], so
//! its identifier map can never outlive the snapshot it describes. Actions run
//! one after another; each produces exactly one [`SyncOutcome`] and a failing
//! action never stops the ones after it.

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::backend::CalendarBackend;
use crate::config::SyncConfig;
use crate::crud::CrudClient;
use crate::detect;
use crate::error::SyncError;
use crate::id_map::CalendarContext;
use crate::interval::Interval;
use crate::mapper::{draft_interval, to_wire_body};
use crate::outcome::{
    BatchResult, Conflict, ConflictingEvent, Fallback, MatchedEvent, OutcomeError, OutcomeStatus,
    SyncOutcome,
};
use crate::retry::RetryPolicy;
use crate::types::{ActionKind, ActionRequest, EventId, EventSnapshot};

/// Entry point of the engine: owns the CRUD client and the settings.
#[derive(Debug)]
pub struct Synchronizer<B> {
    client: CrudClient<B>,
    config: SyncConfig,
    tz: TimeZone,
}

impl<B: CalendarBackend> Synchronizer<B> {
    /// Creates a synchronizer over `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the configuration is invalid.
    pub fn new(backend: B, config: SyncConfig) -> Result<Self, SyncError> {
        config.validate()?;
        let tz = config.time_zone()?;
        let client = CrudClient::new(backend, RetryPolicy::from(&config.retry), config.search);
        Ok(Self { client, config, tz })
    }

    /// The underlying CRUD client.
    pub const fn client(&self) -> &CrudClient<B> {
        &self.client
    }

    /// The active configuration.
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Reads `[now, now + window_days)` and starts a batch over it.
    ///
    /// # Errors
    ///
    /// Returns the listing failure, or [`SyncError::Config`] if the window
    /// cannot be represented.
    pub async fn begin(&self, now: Timestamp) -> Result<Batch<'_, B>, SyncError> {
        let window = now
            .checked_add(self.config.window())
            .ok()
            .and_then(|end| Interval::new(now, end))
            .ok_or_else(|| {
                SyncError::Config(format!(
                    "window of {} days from {now} is out of range",
                    self.config.window_days
                ))
            })?;
        let snapshot = self.client.list(window).await?;
        tracing::info!(%window, events = snapshot.len(), "fetched calendar context");
        Ok(self.batch(snapshot))
    }

    /// Starts a batch over an already fetched snapshot.
    #[must_use]
    pub fn batch(&self, snapshot: EventSnapshot) -> Batch<'_, B> {
        let context = CalendarContext::build(&snapshot, &self.tz);
        Batch {
            sync: self,
            snapshot,
            context,
        }
    }
}

/// One synchronization batch over a single snapshot.
#[derive(Debug)]
pub struct Batch<'a, B> {
    sync: &'a Synchronizer<B>,
    snapshot: EventSnapshot,
    context: CalendarContext,
}

impl<B: CalendarBackend> Batch<'_, B> {
    /// The snapshot this batch reasons over.
    #[must_use]
    pub const fn snapshot(&self) -> &EventSnapshot {
        &self.snapshot
    }

    /// The remapped context handed to the upstream decision step.
    #[must_use]
    pub const fn context(&self) -> &CalendarContext {
        &self.context
    }

    /// Applies every action in order and aggregates the outcomes.
    pub async fn apply(self, actions: &[ActionRequest]) -> BatchResult {
        let mut result = BatchResult::default();
        for (index, request) in actions.iter().enumerate() {
            let mut outcome = SyncOutcome::new(index, request);
            let status = match request.action {
                ActionKind::Create => {
                    self.create(request, &mut outcome, &mut result.conflicts).await
                }
                ActionKind::Update => self.update(request, &mut outcome).await,
                ActionKind::Delete => self.delete(request, &mut outcome).await,
            };
            match status {
                Ok(status) => outcome.status = status,
                Err(err) => {
                    tracing::warn!(
                        index,
                        action = %request.action,
                        title = %request.event.title,
                        error = %err,
                        "action failed"
                    );
                    outcome.status = OutcomeStatus::Failed;
                    outcome.error = Some(OutcomeError::from(&err));
                }
            }
            tracing::info!(
                index,
                action = %request.action,
                title = %request.event.title,
                status = %outcome.status,
                "action processed"
            );
            result.record(outcome);
        }
        tracing::info!(
            total = result.total(),
            failed = result.counts.failed,
            conflicts = result.conflicts.len(),
            "batch applied"
        );
        result
    }

    async fn create(
        &self,
        request: &ActionRequest,
        outcome: &mut SyncOutcome,
        conflicts: &mut Vec<Conflict>,
    ) -> Result<OutcomeStatus, SyncError> {
        let event = &request.event;
        let body = to_wire_body(event, &self.sync.tz, &self.sync.config.owner)?;
        let range = draft_interval(event, &self.sync.tz)?;

        let existing = self.snapshot.events();
        if let Some(duplicate) = detect::find_duplicate(&event.title, &range, existing) {
            tracing::info!(title = %event.title, existing = %duplicate.id, "skipping duplicate");
            outcome.event_id = Some(duplicate.id.clone());
            outcome.matched = Some(MatchedEvent::from(duplicate));
            return Ok(OutcomeStatus::SkippedDuplicate);
        }

        let id = self.sync.client.create(&body).await?;
        let overlapping: Vec<_> = detect::find_conflicts(&range, existing)
            .into_iter()
            .map(|e| ConflictingEvent {
                reference: self.context.ids().reference_of(&e.id),
                title: e.title.clone(),
                start: e.start,
                end: e.end,
            })
            .collect();
        if !overlapping.is_empty() {
            tracing::info!(
                title = %event.title,
                count = overlapping.len(),
                "created event overlaps existing events"
            );
            conflicts.push(Conflict {
                index: outcome.index,
                title: event.title.clone(),
                event_id: id.clone(),
                start: range.start(),
                end: range.end(),
                overlapping,
            });
        }
        outcome.event_id = Some(id);
        Ok(OutcomeStatus::Created)
    }

    async fn update(
        &self,
        request: &ActionRequest,
        outcome: &mut SyncOutcome,
    ) -> Result<OutcomeStatus, SyncError> {
        let body = to_wire_body(&request.event, &self.sync.tz, &self.sync.config.owner)?;
        let Some(id) = self.locate(request, outcome).await? else {
            return Ok(OutcomeStatus::SkippedNotFound);
        };
        outcome.event_id = Some(id.clone());

        match self.sync.client.update(&id, &body).await {
            Ok(()) => Ok(OutcomeStatus::Updated),
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    %id,
                    title = %request.event.title,
                    "update target vanished, creating instead"
                );
                let created = self.sync.client.create(&body).await?;
                outcome.event_id = Some(created);
                outcome.fallback = Some(Fallback::RecreatedVanishedEvent);
                Ok(OutcomeStatus::Created)
            }
            Err(err) => Err(err),
        }
    }

    async fn delete(
        &self,
        request: &ActionRequest,
        outcome: &mut SyncOutcome,
    ) -> Result<OutcomeStatus, SyncError> {
        let Some(id) = self.locate(request, outcome).await? else {
            return Ok(OutcomeStatus::SkippedNotFound);
        };
        outcome.event_id = Some(id.clone());

        match self.sync.client.delete(&id).await {
            Ok(()) => Ok(OutcomeStatus::Deleted),
            Err(err) if err.is_not_found() => {
                tracing::info!(%id, "delete target already gone");
                outcome.fallback = Some(Fallback::AlreadyDeleted);
                Ok(OutcomeStatus::Deleted)
            }
            Err(err) => Err(err),
        }
    }

    /// Finds the opaque id an update or delete targets.
    ///
    /// A supplied reference is resolved through the batch's map; when it is
    /// missing or unknown, the remote calendar is searched by title and time.
    /// `Ok(None)` means nothing was found, with the resolution failure (if
    /// any) kept on the outcome.
    async fn locate(
        &self,
        request: &ActionRequest,
        outcome: &mut SyncOutcome,
    ) -> Result<Option<EventId>, SyncError> {
        let mut unresolved = None;
        if let Some(reference) = request.existing_reference {
            match self.context.ids().resolve(reference) {
                Ok(id) => {
                    tracing::debug!(reference, %id, "resolved reference");
                    outcome.matched = self.snapshot.get(id).map(MatchedEvent::from);
                    return Ok(Some(id.clone()));
                }
                Err(err) => {
                    tracing::warn!(
                        reference,
                        title = %request.event.title,
                        "unknown reference, searching by title and time"
                    );
                    unresolved = Some(err);
                }
            }
        }

        let around = draft_interval(&request.event, &self.sync.tz)?;
        match self.sync.client.find_by_title_time(&request.event.title, &around).await? {
            Some(event) => {
                tracing::debug!(id = %event.id, title = %event.title, "matched by title and time");
                outcome.fallback = Some(Fallback::TitleTimeSearch);
                outcome.matched = Some(MatchedEvent::from(&event));
                Ok(Some(event.id))
            }
            None => {
                tracing::info!(
                    title = %request.event.title,
                    "no event to {} found",
                    request.action
                );
                outcome.error = unresolved.as_ref().map(OutcomeError::from);
                Ok(None)
            }
        }
    }
}
