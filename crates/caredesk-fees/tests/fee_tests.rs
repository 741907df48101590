//! End-to-end tests for fee-request reconciliation against the in-memory
//! collaborators.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use caredesk_core::{FeeStatus, Professional, ProfessionalId};
use caredesk_fees::{FeeError, FeeRequestService, ReviewDecision};
use caredesk_store::{DocumentStore, MemoryNotifier, MemoryStore};

use common::{init_test_logging, professional, seed_professional, with_pending_request};

fn harness() -> (Arc<MemoryStore>, Arc<MemoryNotifier>, FeeRequestService) {
    init_test_logging();
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(MemoryNotifier::new());
    let service = FeeRequestService::new(store.clone(), notifier.clone());
    (store, notifier, service)
}

async fn stored(store: &MemoryStore, id: ProfessionalId) -> Professional {
    let value = store
        .read(&format!("professionals/{id}"))
        .await
        .unwrap()
        .unwrap();
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_approval_promotes_the_requested_fee() {
    let (store, _notifier, service) = harness();
    let doc = with_pending_request(professional("doc@example.com"), Utc::now());
    let id = seed_professional(&store, &doc).await;

    let updated = service
        .update_status(id, &ReviewDecision::approve("admin-1").with_notes("ok"))
        .await
        .unwrap();

    assert_eq!(updated.professional_fee, 2500.0);
    assert_eq!(updated.fee_status, Some(FeeStatus::Approved));
    assert!(!updated.has_pending_fee_request());

    let persisted = stored(&store, id).await;
    assert_eq!(persisted.professional_fee, 2500.0);
    let marker = persisted.fee_change_request.unwrap();
    assert_eq!(marker.status, FeeStatus::Approved);
    assert_eq!(marker.reviewed_by.as_deref(), Some("admin-1"));
    assert_eq!(marker.review_notes.as_deref(), Some("ok"));
    assert!(marker.reviewed_at.is_some());
}

#[tokio::test]
async fn test_rejection_restores_the_previous_fee() {
    let (store, _notifier, service) = harness();
    let doc = with_pending_request(professional("doc@example.com"), Utc::now());
    let id = seed_professional(&store, &doc).await;

    let updated = service
        .update_status(id, &ReviewDecision::reject("admin-1"))
        .await
        .unwrap();

    assert_eq!(updated.professional_fee, 2000.0);
    assert_eq!(updated.fee_status, Some(FeeStatus::Rejected));
    assert!(!updated.has_pending_fee_request());
}

#[tokio::test]
async fn test_unknown_doctor_is_a_loud_error() {
    let (_store, _notifier, service) = harness();
    let err = service
        .update_status(ProfessionalId::new(), &ReviewDecision::approve("admin-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FeeError::DoctorNotFound(_)));
}

#[tokio::test]
async fn test_review_without_pending_request_is_rejected() {
    let (store, _notifier, service) = harness();
    let id = seed_professional(&store, &professional("doc@example.com")).await;

    let err = service
        .update_status(id, &ReviewDecision::approve("admin-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FeeError::NoPendingRequest(_)));

    // A completed review cannot be applied twice.
    let doc = with_pending_request(professional("doc2@example.com"), Utc::now());
    let id = seed_professional(&store, &doc).await;
    service
        .update_status(id, &ReviewDecision::approve("admin-1"))
        .await
        .unwrap();
    let err = service
        .update_status(id, &ReviewDecision::approve("admin-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FeeError::NoPendingRequest(_)));
}

#[tokio::test]
async fn test_notification_failure_never_rolls_back_the_review() {
    let (store, notifier, service) = harness();
    notifier.set_failing(true);
    let doc = with_pending_request(professional("doc@example.com"), Utc::now());
    let id = seed_professional(&store, &doc).await;

    let updated = service
        .update_status(id, &ReviewDecision::approve("admin-1"))
        .await
        .unwrap();
    assert_eq!(updated.professional_fee, 2500.0);
    assert_eq!(stored(&store, id).await.professional_fee, 2500.0);
}

#[tokio::test]
async fn test_review_notifies_the_doctor_and_logs_activity() {
    let (store, notifier, service) = harness();
    let doc = with_pending_request(professional("doc@example.com"), Utc::now());
    let id = seed_professional(&store, &doc).await;

    service
        .update_status(id, &ReviewDecision::approve("admin-1"))
        .await
        .unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, id.to_string());
    assert!(sent[0].1.title.contains("approved"));

    let log = store
        .read(&format!("activity_logs/{id}"))
        .await
        .unwrap()
        .unwrap();
    let entries: Vec<&Value> = log.as_object().unwrap().values().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["event"], "fee_request_reviewed");
    assert_eq!(entries[0]["new_fee"], 2500.0);
}

#[tokio::test]
async fn test_list_pending_is_oldest_first_and_skips_noise() {
    let (store, _notifier, service) = harness();

    let newer = with_pending_request(professional("new@example.com"), Utc::now());
    let older =
        with_pending_request(professional("old@example.com"), Utc::now() - Duration::hours(2));
    seed_professional(&store, &newer).await;
    seed_professional(&store, &older).await;
    // No pending marker, a pending non-specialist, and one unparseable
    // record.
    seed_professional(&store, &professional("quiet@example.com")).await;
    let mut gp = with_pending_request(professional("gp@example.com"), Utc::now());
    gp.is_specialist = false;
    seed_professional(&store, &gp).await;
    store
        .write("professionals/garbage", serde_json::json!({"email": 42}))
        .await
        .unwrap();

    let pending = service.list_pending().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].professional_id, older.id);
    assert_eq!(pending[1].professional_id, newer.id);
    assert_eq!(pending[0].previous_fee, 2000.0);
    assert_eq!(pending[0].requested_fee, 2500.0);
    assert_eq!(pending[0].doctor_name, "Maria Santos");
    assert_eq!(pending[0].email, "old@example.com");
}

#[tokio::test]
async fn test_bulk_approve_continues_past_failures() {
    let (store, _notifier, service) = harness();
    let a = with_pending_request(professional("a@example.com"), Utc::now());
    let b = with_pending_request(professional("b@example.com"), Utc::now());
    let id_a = seed_professional(&store, &a).await;
    let id_b = seed_professional(&store, &b).await;
    let missing = ProfessionalId::new();

    let outcome = service
        .bulk_approve(&[id_a, missing, id_b], "admin-1", None)
        .await;

    assert_eq!(outcome.succeeded, vec![id_a, id_b]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, missing);
    assert!(!outcome.is_complete_success());
    assert_eq!(stored(&store, id_a).await.professional_fee, 2500.0);
    assert_eq!(stored(&store, id_b).await.professional_fee, 2500.0);
}

#[tokio::test]
async fn test_bulk_reject_restores_fees() {
    let (store, _notifier, service) = harness();
    let a = with_pending_request(professional("a@example.com"), Utc::now());
    let id_a = seed_professional(&store, &a).await;

    let outcome = service
        .bulk_reject(&[id_a], "admin-1", Some("not justified"))
        .await;
    assert!(outcome.is_complete_success());
    let persisted = stored(&store, id_a).await;
    assert_eq!(persisted.professional_fee, 2000.0);
    assert_eq!(persisted.fee_status, Some(FeeStatus::Rejected));
    let marker = persisted.fee_change_request.unwrap();
    assert_eq!(marker.review_notes.as_deref(), Some("not justified"));
}

#[tokio::test]
async fn test_offline_store_surfaces_as_store_error() {
    let (store, _notifier, service) = harness();
    store.set_offline(true);
    let err = service.list_pending().await.unwrap_err();
    assert!(matches!(err, FeeError::Store(_)));
}
