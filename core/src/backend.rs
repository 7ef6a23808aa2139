// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::interval::Interval;
use crate::mapper::WireBody;
use crate::types::{EventId, EventPage};

/// Raw access to one remote calendar.
///
/// Every method performs a single call and reports failures as a
/// [`RemoteError`] tagged with its fault class; retrying is left to the caller.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Inserts an event and returns the id the remote assigned.
    async fn insert(&self, body: &WireBody) -> Result<EventId, RemoteError>;

    /// Lists one page of events overlapping `window`, ordered by start.
    async fn list_page(
        &self,
        window: &Interval,
        page_token: Option<&str>,
    ) -> Result<EventPage, RemoteError>;

    /// Replaces the event `id` with `body`.
    async fn update(&self, id: &EventId, body: &WireBody) -> Result<(), RemoteError>;

    /// Deletes the event `id`.
    async fn delete(&self, id: &EventId) -> Result<(), RemoteError>;

    /// Obtains fresh credentials after an `AuthExpired` fault.
    async fn refresh_credentials(&self) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: CalendarBackend + ?Sized> CalendarBackend for &T {
    async fn insert(&self, body: &WireBody) -> Result<EventId, RemoteError> {
        (**self).insert(body).await
    }

    async fn list_page(
        &self,
        window: &Interval,
        page_token: Option<&str>,
    ) -> Result<EventPage, RemoteError> {
        (**self).list_page(window, page_token).await
    }

    async fn update(&self, id: &EventId, body: &WireBody) -> Result<(), RemoteError> {
        (**self).update(id, body).await
    }

    async fn delete(&self, id: &EventId) -> Result<(), RemoteError> {
        (**self).delete(id).await
    }

    async fn refresh_credentials(&self) -> Result<(), RemoteError> {
        (**self).refresh_credentials().await
    }
}
