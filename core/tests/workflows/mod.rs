// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the calsync-core crate.
//!
//! Each test fetches a context from an in-memory calendar, applies a batch of
//! actions, and checks both the batch result and the calendar's final state.

mod batch;
mod faults;
