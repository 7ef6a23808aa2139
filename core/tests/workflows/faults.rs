// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Remote faults surfacing through a batch.

use calsync_core::{ActionRequest, ErrorKind, EventDraft, Fault, OutcomeStatus, Synchronizer};

use crate::common::{Call, FakeCalendar, dt, test_config, ts};

const NOW: &str = "2026-03-02T00:00:00Z";

fn gym() -> ActionRequest {
    ActionRequest::create(EventDraft::new("Gym", dt("2026-03-02T18:00:00")))
}

fn yoga() -> ActionRequest {
    ActionRequest::create(EventDraft::new("Yoga", dt("2026-03-03T07:00:00")))
}

#[tokio::test]
async fn rate_limit_gives_up_after_three_attempts() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::RateLimited, 5);

    // Act
    let result = batch.apply(&[gym()]).await;

    // Assert
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert_eq!(outcome.error.as_ref().map(|e| e.kind), Some(ErrorKind::RateLimited));
    assert_eq!(fake.insert_calls(), 3);
    assert!(fake.events().is_empty());
}

#[tokio::test]
async fn transient_faults_recover_within_the_cap() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::Unavailable, 1);
    fake.fail_insert(Fault::RateLimited, 1);

    // Act
    let result = batch.apply(&[gym()]).await;

    // Assert
    assert_eq!(result.outcomes[0].status, OutcomeStatus::Created);
    assert_eq!(fake.insert_calls(), 3);
    assert_eq!(fake.events().len(), 1);
}

#[tokio::test]
async fn expired_credentials_are_refreshed_once() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::AuthExpired, 1);

    // Act
    let result = batch.apply(&[gym()]).await;

    // Assert
    assert_eq!(result.outcomes[0].status, OutcomeStatus::Created);
    let calls: Vec<_> = fake
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, Call::List(_)))
        .collect();
    assert_eq!(
        calls,
        [Call::Insert("Gym".into()), Call::Refresh, Call::Insert("Gym".into())]
    );
}

#[tokio::test]
async fn auth_failure_is_captured_per_action() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::AuthExpired, 2);

    // Act
    let result = batch.apply(&[gym(), yoga()]).await;

    // Assert
    assert_eq!(result.outcomes[0].status, OutcomeStatus::Failed);
    assert_eq!(
        result.outcomes[0].error.as_ref().map(|e| e.kind),
        Some(ErrorKind::AuthFailed)
    );
    assert_eq!(result.outcomes[1].status, OutcomeStatus::Created);
    assert!(result.auth_failed());
    assert_eq!(result.total(), 2);
}

#[tokio::test]
async fn failed_refresh_is_auth_failure() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::AuthExpired, 1);
    fake.fail_refresh(1);

    // Act
    let result = batch.apply(&[gym()]).await;

    // Assert
    assert!(result.auth_failed());
    assert_eq!(fake.insert_calls(), 1);
}

#[tokio::test]
async fn rejected_call_is_not_retried() {
    // Arrange
    let fake = FakeCalendar::new([]);
    let sync = Synchronizer::new(&fake, test_config()).unwrap();
    let batch = sync.begin(ts(NOW)).await.unwrap();
    fake.fail_insert(Fault::Rejected, 1);

    // Act
    let result = batch.apply(&[gym(), yoga()]).await;

    // Assert
    assert_eq!(
        result.outcomes[0].error.as_ref().map(|e| e.kind),
        Some(ErrorKind::Rejected)
    );
    assert_eq!(result.outcomes[1].status, OutcomeStatus::Created);
    assert_eq!(fake.insert_calls(), 2);
}
