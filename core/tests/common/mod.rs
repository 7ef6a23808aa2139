// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! - An in-memory calendar backend that records calls and can be scripted to fail
//! - Test data factories (fixtures)


#[allow(unused_imports)]
pub use backend::{Call, FakeCalendar};
#[allow(unused_imports)]
pub use fixtures::{dt, remote_event, test_config, ts};
