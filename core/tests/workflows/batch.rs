// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Batches of create, update and delete actions.

use calsync_core::{
    ActionRequest, ErrorKind, EventDraft, Fallback, Fault, OutcomeStatus, Synchronizer,
};

use crate::common::{Call, FakeCalendar, dt, remote_event, test_config, ts};

const NOW: &str = "2026-03-02T00:00:00Z";

#[tokio::test]
async fn update_by_reference_moves_event() {
    // Arrange
    let fake = FakeCalendar::new([remote_event(
        "g7a9x",
        "Standup",
        "2026-03-02T09:00:00",
        "2026-03-02T09:30:00",
    )]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let draft = EventDraft::new("Standup", dt("2026-03-02T10:00:00"))
        .with_end(dt("2026-03-02T10:30:00"));

    // Act
    let result = batch.apply(&[ActionRequest::update(draft, Some(1))]).await;

    // Assert
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Updated);
    assert_eq!(outcome.event_id.as_deref(), Some("g7a9x"));
    assert_eq!(outcome.matched.as_ref().map(|m| m.title.as_str()), Some("Standup"));
    assert_eq!(outcome.fallback, None);

    let body = fake.body("g7a9x").unwrap();
    assert_eq!(body.summary, "Standup");
    assert_eq!(body.start.date_time, dt("2026-03-02T10:00:00"));
    assert_eq!(body.end.date_time, dt("2026-03-02T10:30:00"));

    let event = fake.event("g7a9x").unwrap();
    assert_eq!(event.title, "Standup");
    assert_eq!(event.start, ts("2026-03-02T10:00:00Z"));
    assert_eq!(event.end, ts("2026-03-02T10:30:00Z"));
}

#[tokio::test]
async fn delete_of_vanished_event_is_deleted() {
    // Arrange
    let fake = FakeCalendar::new([remote_event(
        "q81ff",
        "Dentist",
        "2026-03-04T16:00:00",
        "2026-03-04T17:00:00",
    )]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.vanish("q81ff");
    let draft = EventDraft::new("Dentist", dt("2026-03-04T16:00:00"));

    // Act
    let result = batch.apply(&[ActionRequest::delete(draft, Some(1))]).await;

    // Assert
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Deleted);
    assert_eq!(outcome.fallback, Some(Fallback::AlreadyDeleted));
    assert_eq!(outcome.error, None);
    assert!(!result.has_failures());
    assert_eq!(
        fake.calls().iter().filter(|c| matches!(c, Call::Delete(_))).count(),
        1,
        "not found is never retried"
    );
}

#[tokio::test]
async fn create_of_existing_event_is_skipped() {
    // Arrange
    let fake = FakeCalendar::new([remote_event(
        "l1",
        "lunch",
        "2026-03-02T12:15:00",
        "2026-03-02T12:45:00",
    )]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let draft =
        EventDraft::new("Lunch", dt("2026-03-02T12:00:00")).with_end(dt("2026-03-02T13:00:00"));

    // Act
    let result = batch.apply(&[ActionRequest::create(draft)]).await;

    // Assert
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::SkippedDuplicate);
    assert_eq!(outcome.event_id.as_deref(), Some("l1"));
    assert_eq!(fake.insert_calls(), 0);
    assert_eq!(result.counts.skipped_duplicate, 1);
}

#[tokio::test]
async fn update_without_reference_or_match_is_skipped() {
    // Arrange
    let fake = FakeCalendar::new([remote_event(
        "g7a9x",
        "Standup",
        "2026-03-02T09:00:00",
        "2026-03-02T09:30:00",
    )]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let draft = EventDraft::new("Retro", dt("2026-03-05T15:00:00"));

    // Act
    let result = batch.apply(&[ActionRequest::update(draft, None)]).await;

    // Assert
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::SkippedNotFound);
    assert_eq!(outcome.event_id, None);
    assert_eq!(outcome.error, None);
    assert!(!fake.calls().iter().any(|c| matches!(c, Call::Update(_))));
    assert_eq!(fake.event("g7a9x").unwrap().start, ts("2026-03-02T09:00:00Z"));
}

#[tokio::test]
async fn failing_action_does_not_stop_the_batch() {
    // Arrange
    let fake = FakeCalendar::new([
        remote_event("a", "Standup", "2026-03-02T09:00:00", "2026-03-02T09:30:00"),
        remote_event("b", "Review", "2026-03-03T15:00:00", "2026-03-03T16:00:00"),
    ]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_update(Fault::Unavailable, 3);
    let actions = [
        ActionRequest::create(EventDraft::new("Gym", dt("2026-03-02T18:00:00"))),
        ActionRequest::update(EventDraft::new("Standup", dt("2026-03-02T11:00:00")), Some(1)),
        ActionRequest::delete(EventDraft::new("Review", dt("2026-03-03T15:00:00")), Some(2)),
    ];

    // Act
    let result = batch.apply(&actions).await;

    // Assert
    let statuses: Vec<_> = result.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        [OutcomeStatus::Created, OutcomeStatus::Failed, OutcomeStatus::Deleted]
    );
    let indices: Vec<_> = result.outcomes.iter().map(|o| o.index).collect();
    assert_eq!(indices, [0, 1, 2]);

    let error = result.outcomes[1].error.as_ref().unwrap();
    assert_eq!(error.kind, ErrorKind::Unavailable);
    assert_eq!(
        fake.calls().iter().filter(|c| matches!(c, Call::Update(_))).count(),
        3
    );
    assert!(fake.event("b").is_none());
    assert!(result.has_failures());
    assert!(!result.auth_failed());
}

#[tokio::test]
async fn every_action_yields_exactly_one_outcome() {
    // Arrange
    let fake = FakeCalendar::new([
        remote_event("a", "Standup", "2026-03-02T09:00:00", "2026-03-02T09:30:00"),
        remote_event("b", "Lunch", "2026-03-02T12:00:00", "2026-03-02T13:00:00"),
    ]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let actions = [
        // duplicate
        ActionRequest::create(EventDraft::new("lunch", dt("2026-03-02T12:30:00"))),
        // inverted range
        ActionRequest::create(
            EventDraft::new("Broken", dt("2026-03-02T15:00:00"))
                .with_end(dt("2026-03-02T14:00:00")),
        ),
        // unknown reference, nothing similar
        ActionRequest::update(EventDraft::new("Offsite", dt("2026-03-06T09:00:00")), Some(42)),
        ActionRequest::update(EventDraft::new("Standup", dt("2026-03-02T09:15:00")), Some(1)),
        ActionRequest::delete(EventDraft::new("Lunch", dt("2026-03-02T12:00:00")), Some(2)),
        ActionRequest::create(EventDraft::new("Yoga", dt("2026-03-07T08:00:00"))),
    ];

    // Act
    let result = batch.apply(&actions).await;

    // Assert
    assert_eq!(result.total(), actions.len());
    assert_eq!(result.counts.total(), actions.len());
    assert_eq!(result.counts.skipped_duplicate, 1);
    assert_eq!(result.counts.failed, 1);
    assert_eq!(result.counts.skipped_not_found, 1);
    assert_eq!(result.counts.updated, 1);
    assert_eq!(result.counts.deleted, 1);
    assert_eq!(result.counts.created, 1);

    let invalid = result.outcomes[1].error.as_ref().unwrap();
    assert_eq!(invalid.kind, ErrorKind::InvalidEvent);
    let unresolved = result.outcomes[2].error.as_ref().unwrap();
    assert_eq!(unresolved.kind, ErrorKind::ResolutionFailed);
}

#[tokio::test]
async fn created_event_reports_conflicts() {
    // Arrange
    let fake = FakeCalendar::new([
        remote_event("a", "Design review", "2026-03-02T12:30:00", "2026-03-02T13:30:00"),
        remote_event("b", "Focus time", "2026-03-02T13:00:00", "2026-03-02T14:00:00"),
    ]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let draft =
        EventDraft::new("Lunch", dt("2026-03-02T12:00:00")).with_end(dt("2026-03-02T13:00:00"));

    // Act
    let result = batch.apply(&[ActionRequest::create(draft)]).await;

    // Assert
    assert_eq!(result.outcomes[0].status, OutcomeStatus::Created);
    assert!(result.has_conflicts());
    let conflict = &result.conflicts[0];
    assert_eq!(conflict.index, 0);
    assert_eq!(Some(&conflict.event_id), result.outcomes[0].event_id.as_ref());
    let overlapping: Vec<_> = conflict
        .overlapping
        .iter()
        .map(|e| (e.reference, e.title.as_str()))
        .collect();
    assert_eq!(overlapping, [(Some(1), "Design review")]);
    assert_eq!(fake.insert_calls(), 1);
}

#[tokio::test]
async fn owner_and_decision_trail_reach_the_remote_body() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    let mut draft = EventDraft::new("Planning", dt("2026-03-03T14:00:00"))
        .with_attendees(["Dana Whitfield", "Priya"])
        .with_location("Room 4");
    draft.reasoning = Some("Priya asked for a planning slot".to_string());

    // Act
    let result = batch.apply(&[ActionRequest::create(draft)]).await;

    // Assert
    let id = result.outcomes[0].event_id.clone().unwrap();
    let body = fake.body(&id).unwrap();
    assert_eq!(body.attendees.len(), 1);
    assert_eq!(body.attendees[0].email, "dana@example.com");
    assert_eq!(
        body.description,
        "Reasoning: Priya asked for a planning slot\nOther attendees: Priya"
    );
    assert_eq!(body.location.as_deref(), Some("Room 4"));
    assert_eq!(body.end.date_time, dt("2026-03-03T15:00:00"));
}
