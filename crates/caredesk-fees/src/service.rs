//! The fee-request reconciliation service.
//!
//! Reviews mutate exactly one professional record per request. The profile
//! write is the commit point; the activity-log entry and the doctor
//! notification that follow are best-effort and never roll it back.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use caredesk_core::{Professional, ProfessionalId};
use caredesk_store::{paths, DocumentStore, Notification, NotificationPriority, Notifier};

use crate::error::FeeError;
use crate::models::{BulkOutcome, FeeChangeRequest, ReviewAction, ReviewDecision};

/// Reconciles pending fee-change requests against professional records.
pub struct FeeRequestService {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl FeeRequestService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// List every professional with a fee-change request still pending.
    ///
    /// Malformed records are skipped rather than failing the listing; one
    /// bad record must not hide every reviewable request.
    pub async fn list_pending(&self) -> Result<Vec<FeeChangeRequest>, FeeError> {
        let mut pending = Vec::new();
        if let Some(Value::Object(children)) = self.store.read(&paths::professionals()).await? {
            for (key, value) in children {
                match serde_json::from_value::<Professional>(value) {
                    Ok(professional) => {
                        if let Some(request) = FeeChangeRequest::from_professional(&professional) {
                            pending.push(request);
                        }
                    }
                    Err(err) => {
                        debug!(professional = %key, %err, "skipping malformed record");
                    }
                }
            }
        }
        // Oldest requests first, the order reviewers work through them.
        pending.sort_by_key(|r| r.requested_at);
        Ok(pending)
    }

    /// Apply a review to one pending request.
    ///
    /// Approval promotes the requested fee to the authoritative fee;
    /// rejection restores the previous fee. Either way the marker leaves
    /// `pending` and records who reviewed it and when. Returns the updated
    /// record.
    pub async fn update_status(
        &self,
        id: ProfessionalId,
        decision: &ReviewDecision,
    ) -> Result<Professional, FeeError> {
        let value = self
            .store
            .read(&paths::professional(id))
            .await?
            .ok_or(FeeError::DoctorNotFound(id))?;
        let mut professional: Professional =
            serde_json::from_value(value).map_err(|err| FeeError::Malformed {
                id,
                message: err.to_string(),
            })?;

        if !professional.has_pending_fee_request() {
            return Err(FeeError::NoPendingRequest(id));
        }
        let Some(marker) = professional.fee_change_request.as_mut() else {
            return Err(FeeError::NoPendingRequest(id));
        };

        let status = decision.action.fee_status();
        let new_fee = match decision.action {
            ReviewAction::Approve => marker.requested_fee,
            ReviewAction::Reject => marker.previous_fee,
        };
        let now = Utc::now();
        marker.status = status;
        marker.reviewed_by = Some(decision.reviewed_by.clone());
        marker.reviewed_at = Some(now);
        marker.review_notes = decision.review_notes.clone();
        let (previous_fee, requested_fee) = (marker.previous_fee, marker.requested_fee);

        professional.professional_fee = new_fee;
        professional.fee_status = Some(status);
        professional.last_updated = now;

        let record = serde_json::to_value(&professional).map_err(|err| FeeError::Malformed {
            id,
            message: err.to_string(),
        })?;
        self.store.write(&paths::professional(id), record).await?;
        info!(
            professional_id = %id,
            action = decision.action.as_str(),
            previous_fee,
            requested_fee,
            new_fee,
            reviewed_by = %decision.reviewed_by,
            "fee request reviewed"
        );

        self.append_activity_log(id, decision, previous_fee, requested_fee, new_fee)
            .await;
        self.notify_doctor(&professional, decision.action, new_fee)
            .await;

        Ok(professional)
    }

    /// Approve every id in order; failures are collected, not fatal.
    pub async fn bulk_approve(
        &self,
        ids: &[ProfessionalId],
        reviewed_by: &str,
        notes: Option<&str>,
    ) -> BulkOutcome {
        let mut decision = ReviewDecision::approve(reviewed_by);
        if let Some(notes) = notes {
            decision = decision.with_notes(notes);
        }
        self.bulk_review(ids, &decision).await
    }

    /// Reject every id in order; failures are collected, not fatal.
    pub async fn bulk_reject(
        &self,
        ids: &[ProfessionalId],
        reviewed_by: &str,
        notes: Option<&str>,
    ) -> BulkOutcome {
        let mut decision = ReviewDecision::reject(reviewed_by);
        if let Some(notes) = notes {
            decision = decision.with_notes(notes);
        }
        self.bulk_review(ids, &decision).await
    }

    /// Apply one decision to many ids, one commit per id, no cross-id
    /// atomicity.
    pub async fn bulk_review(
        &self,
        ids: &[ProfessionalId],
        decision: &ReviewDecision,
    ) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for &id in ids {
            match self.update_status(id, decision).await {
                Ok(_) => outcome.succeeded.push(id),
                Err(err) => {
                    warn!(professional_id = %id, error = %err, "bulk review entry failed");
                    outcome.failed.push((id, err.to_string()));
                }
            }
        }
        info!(
            action = decision.action.as_str(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk review complete"
        );
        outcome
    }

    /// Best-effort audit entry; a failure is logged and swallowed.
    async fn append_activity_log(
        &self,
        id: ProfessionalId,
        decision: &ReviewDecision,
        previous_fee: f64,
        requested_fee: f64,
        new_fee: f64,
    ) {
        let entry_id = Uuid::new_v4().to_string();
        let entry = serde_json::json!({
            "event": "fee_request_reviewed",
            "action": decision.action.as_str(),
            "reviewed_by": decision.reviewed_by,
            "review_notes": decision.review_notes,
            "previous_fee": previous_fee,
            "requested_fee": requested_fee,
            "new_fee": new_fee,
            "at": Utc::now(),
        });
        if let Err(err) = self
            .store
            .write(&paths::activity_log(id, &entry_id), entry)
            .await
        {
            warn!(professional_id = %id, error = %err, "activity log write failed");
        }
    }

    /// Best-effort doctor notification; a failure is logged and swallowed.
    async fn notify_doctor(&self, professional: &Professional, action: ReviewAction, new_fee: f64) {
        let notification = Notification {
            title: format!("Fee change request {}", action.as_str()),
            message: format!(
                "Your professional fee request was {}. Your current fee is {new_fee:.2}.",
                action.as_str()
            ),
            category: "fees".to_string(),
            priority: NotificationPriority::Normal,
        };
        if let Err(err) = self
            .notifier
            .notify(&professional.id.to_string(), notification)
            .await
        {
            warn!(
                professional_id = %professional.id,
                error = %err,
                "fee review notification failed"
            );
        }
    }
}
