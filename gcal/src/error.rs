// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use calsync_core::{Fault, RemoteError};

/// Google backend errors that are not tied to a single HTTP exchange.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    /// HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A URL could not be built from the configuration.
    #[error("invalid URL: {0}")]
    Url(String),

    /// Response body could not be decoded.
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GoogleError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<GoogleError> for RemoteError {
    fn from(e: GoogleError) -> Self {
        Self::new(Fault::Rejected, e.to_string())
    }
}
