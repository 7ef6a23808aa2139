// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fault class reported by a backend for a single raw call.
///
/// The retry policy decides what to do purely from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    /// The remote asked us to slow down.
    RateLimited,

    /// The credentials were rejected as expired.
    AuthExpired,

    /// Network trouble, timeouts, or a temporarily failing server.
    Unavailable,

    /// The referenced resource does not exist (any more).
    NotFound,

    /// Any other refusal; retrying will not help.
    Rejected,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RateLimited => "rate limited",
            Self::AuthExpired => "authorization expired",
            Self::Unavailable => "unavailable",
            Self::NotFound => "not found",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Error of a single raw call against the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{fault}: {message}")]
pub struct RemoteError {
    /// The fault class driving the retry policy.
    pub fault: Fault,
    /// Human readable detail, usually the remote response body.
    pub message: String,
}

impl RemoteError {
    /// Creates a new remote error.
    pub fn new(fault: Fault, message: impl Into<String>) -> Self {
        Self {
            fault,
            message: message.into(),
        }
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Fault::NotFound, message)
    }

    /// Shorthand for an `Unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Fault::Unavailable, message)
    }

    /// Shorthand for a `Rejected` error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(Fault::Rejected, message)
    }
}

/// Errors surfaced by the synchronization engine.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Still rate limited after exhausting every attempt.
    #[error("rate limited after {attempts} attempt(s): {message}")]
    RateLimited {
        /// Number of attempts made.
        attempts: u32,
        /// Last remote message.
        message: String,
    },

    /// Credentials could not be refreshed, or were rejected after a refresh.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Remote unreachable after exhausting every attempt.
    #[error("calendar unavailable after {attempts} attempt(s): {message}")]
    Unavailable {
        /// Number of attempts made.
        attempts: u32,
        /// Last remote message.
        message: String,
    },

    /// The referenced event does not exist remotely.
    #[error("event not found: {0}")]
    NotFound(String),

    /// The event data cannot be turned into a valid remote event.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// An integer reference that is not part of the current identifier map.
    #[error("reference {0} is not part of the current snapshot")]
    ResolutionFailed(u32),

    /// The remote refused the call for a reason retrying cannot fix.
    #[error("calendar rejected the request: {0}")]
    Rejected(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// The serializable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::AuthFailed(_) => ErrorKind::AuthFailed,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidEvent(_) => ErrorKind::InvalidEvent,
            Self::ResolutionFailed(_) => ErrorKind::ResolutionFailed,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether this error is the remote reporting a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Kind tag of a [`SyncError`], carried in batch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`SyncError::RateLimited`].
    RateLimited,
    /// See [`SyncError::AuthFailed`].
    AuthFailed,
    /// See [`SyncError::Unavailable`].
    Unavailable,
    /// See [`SyncError::NotFound`].
    NotFound,
    /// See [`SyncError::InvalidEvent`].
    InvalidEvent,
    /// See [`SyncError::ResolutionFailed`].
    ResolutionFailed,
    /// See [`SyncError::Rejected`].
    Rejected,
    /// See [`SyncError::Config`].
    Config,
}
