// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::backend::CalendarBackend;
use crate::config::SearchConfig;
use crate::detect;
use crate::error::SyncError;
use crate::interval::Interval;
use crate::mapper::WireBody;
use crate::retry::{RetryPolicy, with_retry};
use crate::types::{EventId, EventSnapshot, RemoteEvent};

/// Retried create, list, update and delete against one backend.
#[derive(Debug)]
pub struct CrudClient<B> {
    backend: B,
    policy: RetryPolicy,
    search: SearchConfig,
}

impl<B: CalendarBackend> CrudClient<B> {
    /// Wraps a backend.
    pub fn new(backend: B, policy: RetryPolicy, search: SearchConfig) -> Self {
        Self {
            backend,
            policy,
            search,
        }
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Creates an event and returns its remote id.
    ///
    /// # Errors
    ///
    /// Returns the classified remote failure once retries are exhausted.
    pub async fn create(&self, body: &WireBody) -> Result<EventId, SyncError> {
        let id = with_retry(&self.policy, &self.backend, "create", || {
            self.backend.insert(body)
        })
        .await?;
        tracing::info!(%id, title = %body.summary, "created event");
        Ok(id)
    }

    /// Lists every event overlapping `window`, following pagination.
    ///
    /// # Errors
    ///
    /// Returns the classified remote failure of the first page that gives up.
    pub async fn list(&self, window: Interval) -> Result<EventSnapshot, SyncError> {
        let mut events = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = with_retry(&self.policy, &self.backend, "list", || {
                self.backend.list_page(&window, token.as_deref())
            })
            .await?;
            pages += 1;
            events.extend(page.events);
            match page.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }
        tracing::debug!(%window, pages, count = events.len(), "listed events");
        Ok(EventSnapshot::new(Some(window), events))
    }

    /// Replaces the event `id` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] when the event is gone, or the
    /// classified remote failure once retries are exhausted.
    pub async fn update(&self, id: &EventId, body: &WireBody) -> Result<(), SyncError> {
        with_retry(&self.policy, &self.backend, "update", || {
            self.backend.update(id, body)
        })
        .await?;
        tracing::info!(%id, title = %body.summary, "updated event");
        Ok(())
    }

    /// Deletes the event `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] when the event is gone, or the
    /// classified remote failure once retries are exhausted.
    pub async fn delete(&self, id: &EventId) -> Result<(), SyncError> {
        with_retry(&self.policy, &self.backend, "delete", || self.backend.delete(id)).await?;
        tracing::info!(%id, "deleted event");
        Ok(())
    }

    /// Looks for an event by title near `around`.
    ///
    /// Lists a padded window around `around` and applies
    /// [`detect::find_by_title_time`].
    ///
    /// # Errors
    ///
    /// Returns the listing failure.
    pub async fn find_by_title_time(
        &self,
        title: &str,
        around: &Interval,
    ) -> Result<Option<RemoteEvent>, SyncError> {
        let padding = self.search.padding();
        let window = around
            .start()
            .checked_sub(padding)
            .ok()
            .zip(around.end().checked_add(padding).ok())
            .and_then(|(start, end)| Interval::new(start, end))
            .unwrap_or(*around);

        let snapshot = self.list(window).await?;
        let hit = detect::find_by_title_time(
            title,
            around,
            self.search.tolerance(),
            snapshot.events(),
        )
        .cloned();
        tracing::debug!(title, found = ?hit.as_ref().map(|e| &e.id), "title and time search");
        Ok(hit)
    }
}
