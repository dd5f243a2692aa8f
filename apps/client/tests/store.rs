//! Progress store tests.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};
use vocab_client::api::ApiError;
use vocab_client::store::StoreError;
use vocab_core::{compute_transition, ProgressPatch, ReviewOutcome};

use common::fixtures::{self, reviewed};
use common::store_with;

#[tokio::test]
async fn hydrate_replaces_records_in_backend_order() {
    let (_, store) = store_with(vec![
        reviewed(3, 1, Duration::days(1)),
        reviewed(1, 2, Duration::days(-1)),
    ]);
    store.upsert(99, &ProgressPatch::default());

    let count = assert_ok!(store.hydrate().await);

    assert_eq!(count, 2);
    assert_eq!(store.get(99), None);
    let ids: Vec<i64> = store.snapshot().iter().map(|r| r.word_id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn unauthorized_hydration_keeps_previous_state() {
    let (backend, store) = store_with(vec![reviewed(1, 1, Duration::days(1))]);
    assert_ok!(store.hydrate().await);
    let before = store.snapshot();

    backend.fail_fetch(ApiError::Unauthorized);
    let err = assert_err!(store.hydrate().await);

    assert!(matches!(err, StoreError::Unauthorized));
    assert!(err.is_unauthorized());
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn transient_failure_is_retryable() {
    let (backend, store) = store_with(vec![reviewed(1, 1, Duration::days(1))]);
    assert_ok!(store.hydrate().await);

    backend.fail_fetch(ApiError::Network("connection reset".into()));
    let err = assert_err!(store.hydrate().await);

    assert!(matches!(err, StoreError::Fetch(_)));
    assert!(err.is_retryable());
    assert!(!err.is_unauthorized());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn missing_word_is_none() {
    let (_, store) = store_with(Vec::new());
    assert_eq!(store.get(42), None);
    assert!(store.is_empty());
}

#[tokio::test]
async fn upsert_is_idempotent() {
    let (_, store) = store_with(vec![reviewed(5, 1, Duration::days(2))]);
    assert_ok!(store.hydrate().await);

    let patch = ProgressPatch {
        memory_level: Some(3),
        next_review: Some(fixtures::now() + Duration::days(7)),
        ..Default::default()
    };
    let once = store.upsert(5, &patch);
    let twice = store.upsert(5, &patch);

    assert_eq!(once, twice);
    assert_eq!(store.get(5), Some(once));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn upsert_inserts_unknown_word() {
    let (_, store) = store_with(Vec::new());
    let stored = store.upsert(
        8,
        &ProgressPatch {
            review_count: Some(1),
            ..Default::default()
        },
    );
    assert_eq!(stored.word_id, 8);
    assert_eq!(stored.review_count, 1);
    assert_eq!(stored.memory_level, 0);
    assert_eq!(store.get(8), Some(stored));
}

#[tokio::test]
async fn mutations_bump_revision() {
    let (_, store) = store_with(vec![reviewed(1, 1, Duration::days(1))]);
    let mut rx = store.subscribe();
    let start = store.revision();

    store.upsert(1, &ProgressPatch::default());
    assert_ok!(rx.changed().await);
    assert_ok!(store.hydrate().await);
    store.clear();

    assert_eq!(store.revision(), start + 3);
}

#[tokio::test]
async fn record_transition_adopts_canonical_record_and_keeps_content() {
    let (backend, store) = store_with(vec![reviewed(2, 1, Duration::days(1))]);
    assert_ok!(store.hydrate().await);

    let previous = store.get(2).unwrap();
    let next = compute_transition(&previous, ReviewOutcome::Correct, fixtures::now()).progress;
    let stored = assert_ok!(store.record_transition(next.clone()).await);

    assert_eq!(stored, next);
    assert_eq!(store.get(2), Some(next.clone()));
    assert!(store.get(2).unwrap().word.is_some());
    assert_eq!(backend.persisted(), vec![next]);
}

#[tokio::test]
async fn failed_persist_keeps_local_value() {
    let (backend, store) = store_with(vec![reviewed(2, 1, Duration::days(1))]);
    assert_ok!(store.hydrate().await);
    backend.fail_persist(ApiError::Backend {
        status: 502,
        message: "bad gateway".into(),
    });

    let previous = store.get(2).unwrap();
    let next = compute_transition(&previous, ReviewOutcome::Learned, fixtures::now()).progress;
    let err = assert_err!(store.record_transition(next.clone()).await);

    assert!(matches!(err, StoreError::Persist { word_id: 2, .. }));
    assert!(err.is_retryable());
    assert_eq!(store.get(2), Some(next));
    assert!(backend.persisted().is_empty());
}

#[tokio::test]
async fn canonical_record_can_clear_fields() {
    let (backend, store) = store_with(vec![reviewed(4, 2, Duration::days(1))]);
    assert_ok!(store.hydrate().await);
    backend.canonicalize_with(|p| p.next_review = None);

    let previous = store.get(4).unwrap();
    let next = compute_transition(&previous, ReviewOutcome::Correct, fixtures::now()).progress;
    let stored = assert_ok!(store.record_transition(next).await);

    assert_eq!(stored.next_review, None);
    assert_eq!(stored.memory_level, 3);
    assert_eq!(store.get(4), Some(stored.clone()));
    assert_eq!(stored.word, previous.word);
}
