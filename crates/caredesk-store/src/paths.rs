//! Canonical key paths in the document tree.
//!
//! Every collection the portal touches is addressed through these
//! builders so path strings never appear inline at call sites.

use caredesk_core::ProfessionalId;

/// The professionals collection root.
#[must_use]
pub fn professionals() -> String {
    "professionals".to_string()
}

/// A single professional record.
#[must_use]
pub fn professional(id: ProfessionalId) -> String {
    format!("professionals/{id}")
}

/// The denormalized schedule record for a professional.
#[must_use]
pub fn schedules(id: ProfessionalId) -> String {
    format!("schedules/{id}")
}

/// The clinics collection root.
#[must_use]
pub fn clinics() -> String {
    "clinics".to_string()
}

/// Activity-log entry for a professional.
#[must_use]
pub fn activity_log(id: ProfessionalId, entry_id: &str) -> String {
    format!("activity_logs/{id}/{entry_id}")
}
