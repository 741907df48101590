//! View and decision types for the reconciliation workflow.

use chrono::{DateTime, Utc};
use serde::Serialize;

use caredesk_core::{FeeStatus, Professional, ProfessionalId};

/// The reviewer's verdict on a pending fee-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// The terminal marker status this action produces.
    #[must_use]
    pub fn fee_status(self) -> FeeStatus {
        match self {
            ReviewAction::Approve => FeeStatus::Approved,
            ReviewAction::Reject => FeeStatus::Rejected,
        }
    }

    /// Lowercase label for logs and activity entries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approved",
            ReviewAction::Reject => "rejected",
        }
    }
}

/// A review to apply to one or more pending requests.
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub action: ReviewAction,
    /// Identifier of the reviewing admin.
    pub reviewed_by: String,
    pub review_notes: Option<String>,
}

impl ReviewDecision {
    #[must_use]
    pub fn approve(reviewed_by: impl Into<String>) -> Self {
        Self {
            action: ReviewAction::Approve,
            reviewed_by: reviewed_by.into(),
            review_notes: None,
        }
    }

    #[must_use]
    pub fn reject(reviewed_by: impl Into<String>) -> Self {
        Self {
            action: ReviewAction::Reject,
            reviewed_by: reviewed_by.into(),
            review_notes: None,
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.review_notes = Some(notes.into());
        self
    }
}

/// List-view projection of a pending fee-change request.
#[derive(Debug, Clone, Serialize)]
pub struct FeeChangeRequest {
    pub professional_id: ProfessionalId,
    pub doctor_name: String,
    pub email: String,
    pub specialty: String,
    pub previous_fee: f64,
    pub requested_fee: f64,
    pub reason: Option<String>,
    pub requested_at: DateTime<Utc>,
}

impl FeeChangeRequest {
    /// Project a specialist carrying a pending marker into the list view.
    /// Returns `None` for non-specialists and records without a pending
    /// marker.
    #[must_use]
    pub fn from_professional(professional: &Professional) -> Option<Self> {
        if !professional.is_specialist || !professional.has_pending_fee_request() {
            return None;
        }
        let marker = professional.fee_change_request.as_ref()?;
        Some(Self {
            professional_id: professional.id,
            doctor_name: professional.display_name(),
            email: professional.email.clone(),
            specialty: professional.specialty.clone(),
            previous_fee: marker.previous_fee,
            requested_fee: marker.requested_fee,
            reason: marker.reason.clone(),
            requested_at: marker.requested_at,
        })
    }
}

/// Outcome of a bulk review: per-record success and failure lists.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<ProfessionalId>,
    pub failed: Vec<(ProfessionalId, String)>,
}

impl BulkOutcome {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}
