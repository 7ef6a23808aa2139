// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duplicate and conflict detection against a snapshot.
//!
//! A duplicate is an existing event with the same title (ignoring case) whose
//! time range overlaps the candidate; it blocks creation. A conflict is any
//! overlapping event regardless of title; it is reported but never blocks.

use jiff::SignedDuration;

use crate::interval::Interval;
use crate::types::RemoteEvent;

/// The first existing event that duplicates the candidate, if any.
#[must_use]
pub fn find_duplicate<'a>(
    title: &str,
    candidate: &Interval,
    existing: &'a [RemoteEvent],
) -> Option<&'a RemoteEvent> {
    existing
        .iter()
        .find(|e| e.title_matches(title) && e.overlaps(candidate))
}

/// Whether some existing event duplicates the candidate.
#[must_use]
pub fn is_duplicate(title: &str, candidate: &Interval, existing: &[RemoteEvent]) -> bool {
    find_duplicate(title, candidate, existing).is_some()
}

/// Every existing event overlapping the candidate, in input order.
#[must_use]
pub fn find_conflicts<'a>(
    candidate: &Interval,
    existing: &'a [RemoteEvent],
) -> Vec<&'a RemoteEvent> {
    existing.iter().filter(|e| e.overlaps(candidate)).collect()
}

/// Best-effort match by title and time.
///
/// Prefers a same-title event overlapping `around`; otherwise picks the
/// same-title event whose start is closest to `around.start()`, as long as it
/// is at most `tolerance` away.
#[must_use]
pub fn find_by_title_time<'a>(
    title: &str,
    around: &Interval,
    tolerance: SignedDuration,
    existing: &'a [RemoteEvent],
) -> Option<&'a RemoteEvent> {
    if let Some(hit) = find_duplicate(title, around, existing) {
        return Some(hit);
    }

    existing
        .iter()
        .filter(|e| e.title_matches(title))
        .map(|e| (e, around.start().duration_since(e.start).abs()))
        .filter(|(_, distance)| *distance <= tolerance)
        .min_by_key(|(_, distance)| *distance)
        .map(|(e, _)| e)
}
