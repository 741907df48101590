//! Shared fixtures for the fee-reconciliation integration tests.

use std::sync::Once;

use chrono::{DateTime, Utc};

use caredesk_core::{
    FeeChangeMarker, FeeStatus, Professional, ProfessionalId, VerificationStatus,
};
use caredesk_store::{DocumentStore, MemoryStore};

static INIT: Once = Once::new();

/// Initialize tracing output for tests, once per process.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A verified professional with fee 2000 and no pending request.
pub fn professional(email: &str) -> Professional {
    let now = Utc::now();
    Professional {
        id: ProfessionalId::new(),
        first_name: "Maria".to_string(),
        middle_name: None,
        last_name: "Santos".to_string(),
        email: email.to_string(),
        contact_number: "+63 917 555 0101".to_string(),
        gender: Some("female".to_string()),
        civil_status: Some("married".to_string()),
        date_of_birth: None,
        address: None,
        specialty: "Cardiology".to_string(),
        license_number: "1234567".to_string(),
        license_expiry: None,
        registration_id: None,
        s2_number: None,
        professional_fee: 2000.0,
        clinic_ids: vec![],
        verification_status: VerificationStatus::Verified,
        is_specialist: true,
        fee_status: None,
        fee_change_request: None,
        schedule_blocks: vec![],
        created_at: now,
        last_updated: now,
    }
}

/// Attach a pending 2000 -> 2500 marker to a professional.
pub fn with_pending_request(mut p: Professional, requested_at: DateTime<Utc>) -> Professional {
    p.fee_status = Some(FeeStatus::Pending);
    p.fee_change_request = Some(FeeChangeMarker {
        status: FeeStatus::Pending,
        previous_fee: p.professional_fee,
        requested_fee: 2500.0,
        reason: Some("rate adjustment".to_string()),
        requested_at,
        reviewed_by: None,
        reviewed_at: None,
        review_notes: None,
    });
    p
}

/// Write a professional record into the store and return its id.
pub async fn seed_professional(store: &MemoryStore, p: &Professional) -> ProfessionalId {
    store
        .write(
            &format!("professionals/{}", p.id),
            serde_json::to_value(p).expect("professional serializes"),
        )
        .await
        .expect("seed professional");
    p.id
}
