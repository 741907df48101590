//! Shared fixtures for the import integration tests.

use std::sync::Once;

use caredesk_core::{Clinic, ClinicId};
use caredesk_import::{ImportRow, OperatorCredential};
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

pub const OPERATOR_EMAIL: &str = "admin@caredesk.ph";
pub const OPERATOR_PASSWORD: &str = "operator-secret";

pub fn operator() -> OperatorCredential {
    OperatorCredential::new(OPERATOR_EMAIL, OPERATOR_PASSWORD)
}

/// Seed a clinic record and return its id.
pub async fn seed_clinic(store: &MemoryStore, name: &str) -> ClinicId {
    let id = ClinicId::new();
    let clinic = Clinic {
        id,
        name: name.to_string(),
        address: None,
    };
    store
        .write(
            &format!("clinics/{id}"),
            serde_json::to_value(&clinic).expect("clinic serializes"),
        )
        .await
        .expect("seed clinic");
    id
}

/// A fully valid onboarding row for the given email and clinic.
pub fn doctor_row(row_number: usize, email: &str, clinic: &str) -> ImportRow {
    ImportRow::from_pairs(
        row_number,
        &[
            ("first_name", "Maria"),
            ("last_name", "Santos"),
            ("email", email),
            ("contact_number", "+63 917 555 0100"),
            ("gender", "female"),
            ("civil_status", "married"),
            ("specialty", "Cardiology"),
            ("license_number", "1234567"),
            ("license_expiry", "2030-06-30"),
            ("professional_fee", "2000"),
            ("clinic_name", clinic),
            ("room", "Room 204"),
            ("schedule_days", "monday,wed,Fri"),
            ("start_time", "09:00"),
            ("end_time", "17:00"),
            ("valid_from", "2026-09-01"),
            ("cadence", "weekly"),
        ],
    )
}
