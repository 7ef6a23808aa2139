// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar synchronization engine.
//!
//! Turns a batch of decided create/update/delete actions into calls against a
//! remote calendar, using a point-in-time snapshot for duplicate and conflict
//! checks and small integer references in place of opaque event ids.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod backend;
mod config;
mod crud;
mod detect;
mod error;
mod id_map;
mod interval;
mod mapper;
mod outcome;
mod retry;
mod sync;
mod types;

pub use crate::backend::CalendarBackend;
pub use crate::config::{APP_NAME, Owner, RetryConfig, SearchConfig, SyncConfig};
pub use crate::crud::CrudClient;
pub use crate::detect::{find_by_title_time, find_conflicts, find_duplicate, is_duplicate};
pub use crate::error::{ErrorKind, Fault, RemoteError, SyncError};
pub use crate::id_map::{CalendarContext, IdentifierMap};
pub use crate::interval::{Interval, overlaps};
pub use crate::mapper::{
    DEFAULT_DURATION, WireAttendee, WireBody, WireDateTime, draft_interval, to_wire_body,
};
pub use crate::outcome::{
    BatchResult, Conflict, ConflictingEvent, Fallback, MatchedEvent, OutcomeCounts, OutcomeError,
    OutcomeStatus, SyncOutcome,
};
pub use crate::retry::{RetryPolicy, with_retry};
pub use crate::sync::{Batch, Synchronizer};
pub use crate::types::{
    ActionKind, ActionRequest, Confidence, EventDraft, EventId, EventPage, EventSnapshot,
    RemoteEvent,
};
