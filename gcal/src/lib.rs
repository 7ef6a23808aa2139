// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Google Calendar v3 backend for the calsync engine.

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
#![allow(clippy::missing_errors_doc)]

mod client;
mod config;
mod error;
mod http;
mod types;

pub use crate::client::GoogleCalendar;
pub use crate::config::{GoogleAuth, GoogleConfig};
pub use crate::error::GoogleError;
pub use crate::http::classify;
pub use crate::types::{EventTime, EventsListResponse, GoogleEvent, TokenResponse};
