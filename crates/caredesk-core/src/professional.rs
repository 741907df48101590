//! Professional profile records.
//!
//! A `Professional` is the destination entity of the bulk import and the
//! record the fee-request workflow reconciles. It is stored as one JSON
//! subtree at `professionals/{id}`; schedule blocks are embedded and also
//! denormalized into the schedules collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ClinicId, ProfessionalId};
use crate::schedule::ScheduleBlock;

/// Verification lifecycle of a professional record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Suspended,
}

/// Status of a fee-change request.
///
/// Appears both inside the embedded [`FeeChangeMarker`] and, denormalized,
/// as the top-level `fee_status` field on [`Professional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Approved,
    Rejected,
}

/// Embedded pending-change marker for a professional's fee.
///
/// Invariant: while `status` is `Pending`, `previous_fee` equals the fee
/// that was authoritative when the request was raised. Reconciliation
/// promotes exactly one of `previous_fee`/`requested_fee` to the
/// authoritative fee and moves `status` out of `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeChangeMarker {
    pub status: FeeStatus,
    pub previous_fee: f64,
    pub requested_fee: f64,
    #[serde(default)]
    pub reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

/// A healthcare professional record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: ProfessionalId,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub civil_status: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    pub specialty: String,
    pub license_number: String,
    #[serde(default)]
    pub license_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub registration_id: Option<String>,
    #[serde(default)]
    pub s2_number: Option<String>,
    pub professional_fee: f64,
    #[serde(default)]
    pub clinic_ids: Vec<ClinicId>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub is_specialist: bool,
    /// Denormalized copy of the marker status, what list views filter on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_status: Option<FeeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_change_request: Option<FeeChangeMarker>,
    #[serde(default)]
    pub schedule_blocks: Vec<ScheduleBlock>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Professional {
    /// Full display name, `First [Middle] Last`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.middle_name {
            Some(m) if !m.is_empty() => {
                format!("{} {} {}", self.first_name, m, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Whether the record carries a fee-change marker still in `Pending`.
    #[must_use]
    pub fn has_pending_fee_request(&self) -> bool {
        matches!(
            &self.fee_change_request,
            Some(marker) if marker.status == FeeStatus::Pending
        )
    }
}
