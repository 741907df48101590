//! The batch import pipeline.
//!
//! One run walks the decoded rows in fixed-size batches. Batches are
//! strictly sequential; records inside a batch run concurrently, each
//! delayed by its index times the stagger interval so account creations
//! don't burst the identity provider. Per-record failures are classified,
//! bookkept in the run report, and never abort the rest of the run.

use std::collections::HashSet;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use caredesk_core::{
    Cadence, Clinic, Professional, ProfessionalId, ScheduleBlock, VerificationStatus,
};
use caredesk_store::{paths, DocumentStore, IdentityProvider};

use crate::columns::ImportRow;
use crate::error::{EngineError, ErrorCategory, ImportFailure, RecordError};
use crate::models::{
    BatchResult, BatchSummary, ImportConfig, IssuedCredential, OperatorCredential,
};
use crate::retry::RetryConfig;
use crate::schedule::{build_slot_template, parse_weekdays};
use crate::validation::{parse_date, validate_row};

/// Bytes of entropy per generated password; encodes to 12 characters.
const PASSWORD_ENTROPY_BYTES: usize = 9;

/// Shared state every record task needs.
struct RecordContext {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    clinics: Vec<Clinic>,
    /// Lowercased emails already taken, seeded from the professionals
    /// collection and grown as records commit.
    known_emails: Mutex<HashSet<String>>,
    retry: RetryConfig,
    operator: OperatorCredential,
}

/// The batch import engine.
pub struct ImportEngine {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    config: ImportConfig,
}

impl ImportEngine {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: ImportConfig,
    ) -> Self {
        Self {
            store,
            identity,
            config,
        }
    }

    /// Run a full import over `rows`.
    ///
    /// Returns an error only for pre-flight problems (no rows, blank
    /// operator credential, unreadable clinic directory). Everything after
    /// pre-flight lands in the returned [`BatchResult`], failures included.
    pub async fn run_import(
        &self,
        rows: Vec<ImportRow>,
        operator: &OperatorCredential,
    ) -> Result<BatchResult, EngineError> {
        if rows.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if operator.is_blank() {
            return Err(EngineError::MissingOperatorCredential);
        }

        let clinics = self.load_clinics().await?;
        let known_emails = self.seed_known_emails().await?;

        let total = rows.len();
        let batch_count = total.div_ceil(self.config.batch_size);
        info!(
            rows = total,
            batches = batch_count,
            batch_size = self.config.batch_size,
            clinics = clinics.len(),
            "starting import run"
        );

        let ctx = Arc::new(RecordContext {
            store: Arc::clone(&self.store),
            identity: Arc::clone(&self.identity),
            clinics,
            known_emails: Mutex::new(known_emails),
            retry: self.config.retry.clone(),
            operator: operator.clone(),
        });

        let mut errors = Vec::new();
        let mut batch_summaries = Vec::new();
        let mut credentials = Vec::new();
        let mut successful = 0usize;

        for (batch_idx, chunk) in rows.chunks(self.config.batch_size).enumerate() {
            let batch = batch_idx + 1;
            debug!(batch, records = chunk.len(), "processing batch");

            let mut handles: Vec<(usize, JoinHandle<Result<IssuedCredential, RecordError>>)> =
                Vec::with_capacity(chunk.len());
            for (i, row) in chunk.iter().cloned().enumerate() {
                let ctx = Arc::clone(&ctx);
                let delay = self.config.record_stagger * i as u32;
                let row_number = row.row_number;
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    process_record(&ctx, &row).await
                });
                handles.push((row_number, handle));
            }

            let mut summary = BatchSummary {
                batch,
                successful: 0,
                failed: 0,
                messages: Vec::new(),
            };
            for (row_number, handle) in handles {
                match handle.await {
                    Ok(Ok(credential)) => {
                        summary.successful += 1;
                        successful += 1;
                        credentials.push(credential);
                    }
                    Ok(Err(record_err)) => {
                        warn!(
                            row = row_number,
                            batch,
                            category = record_err.category.as_str(),
                            error = %record_err.message,
                            "record failed"
                        );
                        summary.failed += 1;
                        summary
                            .messages
                            .push(format!("row {row_number}: {}", record_err.message));
                        errors.push(ImportFailure {
                            row: row_number,
                            error: record_err.message,
                            retryable: record_err.category.is_retryable(),
                            batch,
                            category: record_err.category,
                            timestamp: Utc::now(),
                        });
                    }
                    Err(join_err) => {
                        // The task itself died; the record's true state is
                        // unknown, so flag it for operator re-submission.
                        warn!(row = row_number, batch, error = %join_err, "record task aborted");
                        summary.failed += 1;
                        summary
                            .messages
                            .push(format!("row {row_number}: record task aborted: {join_err}"));
                        errors.push(ImportFailure {
                            row: row_number,
                            error: format!("record task aborted: {join_err}"),
                            retryable: true,
                            batch,
                            category: ErrorCategory::System,
                            timestamp: Utc::now(),
                        });
                    }
                }
            }
            info!(
                batch,
                successful = summary.successful,
                failed = summary.failed,
                "batch complete"
            );
            batch_summaries.push(summary);

            if batch < batch_count {
                tokio::time::sleep(self.config.batch_pause).await;
            }
        }

        let result = BatchResult {
            total,
            successful,
            failed: total - successful,
            errors,
            batch_summaries,
            credentials,
        };
        info!(
            total = result.total,
            successful = result.successful,
            failed = result.failed,
            "import run complete"
        );
        Ok(result)
    }

    /// Read the clinic directory. Malformed entries are skipped so one bad
    /// record never blocks a whole run.
    async fn load_clinics(&self) -> Result<Vec<Clinic>, EngineError> {
        let mut clinics = Vec::new();
        if let Some(Value::Object(children)) = self.store.read(&paths::clinics()).await? {
            for (key, value) in children {
                match serde_json::from_value::<Clinic>(value) {
                    Ok(clinic) => clinics.push(clinic),
                    Err(err) => debug!(clinic = %key, %err, "skipping malformed clinic record"),
                }
            }
        }
        Ok(clinics)
    }

    /// Seed the duplicate check with emails of existing professionals.
    async fn seed_known_emails(&self) -> Result<HashSet<String>, EngineError> {
        let mut emails = HashSet::new();
        if let Some(Value::Object(children)) = self.store.read(&paths::professionals()).await? {
            for value in children.values() {
                if let Some(email) = value.get("email").and_then(Value::as_str) {
                    emails.insert(email.to_lowercase());
                }
            }
        }
        Ok(emails)
    }
}

/// Process one row end to end: validate, resolve the clinic, check for
/// duplicates, create the account (with retry), write profile and schedule,
/// restore the operator session.
async fn process_record(
    ctx: &RecordContext,
    row: &ImportRow,
) -> Result<IssuedCredential, RecordError> {
    let row_number = row.row_number;

    let validation = validate_row(row, row_number);
    for warning in &validation.warnings {
        debug!(row = row_number, %warning, "validation warning");
    }
    if !validation.is_valid {
        return Err(RecordError::validation(validation.joined_errors()));
    }

    let clinic_name = row.require("clinic_name");
    let clinic = ctx
        .clinics
        .iter()
        .find(|c| c.name_matches(clinic_name))
        .ok_or_else(|| {
            let known: Vec<&str> = ctx.clinics.iter().map(|c| c.name.as_str()).collect();
            RecordError::validation(format!(
                "clinic '{clinic_name}' not found; valid clinics: {}",
                known.join(", ")
            ))
        })?;

    let email = row.require("email").to_lowercase();
    {
        let known = ctx.known_emails.lock().await;
        if known.contains(&email) {
            return Err(RecordError::duplicate(format!(
                "email '{email}' already has an account or profile"
            )));
        }
    }

    let weekdays = parse_weekdays(row.require("schedule_days"))
        .map_err(|e| RecordError::validation(e.to_string()))?;
    let slots = build_slot_template(row.require("start_time"), row.require("end_time"))
        .map_err(|e| RecordError::validation(e.to_string()))?;
    let block = ScheduleBlock {
        clinic_id: clinic.id,
        room: row.get("room").unwrap_or_default().to_string(),
        weekdays,
        cadence: parse_cadence(row.get("cadence")),
        slots,
        valid_from: row
            .get("valid_from")
            .and_then(|v| parse_date(v).ok())
            .map_or_else(|| Utc::now().date_naive(), |(d, _)| d),
    };

    let password = generate_password();
    let mut attempt: u32 = 0;
    let account_id = loop {
        match ctx.identity.create_account(&email, &password).await {
            Ok(id) => break id,
            Err(err) => {
                let record_err = RecordError::from(&err);
                if record_err.category.is_retryable() && attempt < ctx.retry.max_retries {
                    let delay = ctx.retry.delay_for(attempt);
                    warn!(
                        row = row_number,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "account creation failed; backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(record_err);
            }
        }
    };

    // From here the account exists; write failures are terminal for the
    // record (never re-create the account) but the operator session is
    // restored on every path.
    let outcome = commit_record(ctx, row, &email, block).await;
    restore_operator_session(ctx, row_number).await;

    match outcome {
        Ok(id) => {
            ctx.known_emails.lock().await.insert(email.clone());
            info!(
                row = row_number,
                professional_id = %id,
                account_id = %account_id,
                "record committed"
            );
            Ok(IssuedCredential { email, password })
        }
        Err(err) => Err(RecordError::new(
            err.category,
            format!("account '{account_id}' was created but the record was not committed: {}", err.message),
        )),
    }
}

/// Write the professional profile and its denormalized schedule record.
async fn commit_record(
    ctx: &RecordContext,
    row: &ImportRow,
    email: &str,
    block: ScheduleBlock,
) -> Result<ProfessionalId, RecordError> {
    let id = ProfessionalId::new();
    let now = Utc::now();
    let professional = Professional {
        id,
        first_name: row.require("first_name").to_string(),
        middle_name: row.get("middle_name").map(ToString::to_string),
        last_name: row.require("last_name").to_string(),
        email: email.to_string(),
        contact_number: row.require("contact_number").to_string(),
        gender: row.get("gender").map(str::to_lowercase),
        civil_status: row.get("civil_status").map(str::to_lowercase),
        date_of_birth: row
            .get("date_of_birth")
            .and_then(|v| parse_date(v).ok())
            .map(|(d, _)| d),
        address: row.get("address").map(ToString::to_string),
        specialty: row.require("specialty").to_string(),
        license_number: row.require("license_number").to_string(),
        license_expiry: row
            .get("license_expiry")
            .and_then(|v| parse_date(v).ok())
            .map(|(d, _)| d),
        registration_id: row.get("registration_id").map(ToString::to_string),
        s2_number: row.get("s2_number").map(ToString::to_string),
        professional_fee: row
            .require("professional_fee")
            .replace(',', "")
            .parse()
            .unwrap_or_default(),
        clinic_ids: vec![block.clinic_id],
        verification_status: VerificationStatus::Pending,
        is_specialist: true,
        fee_status: None,
        fee_change_request: None,
        schedule_blocks: vec![block.clone()],
        created_at: now,
        last_updated: now,
    };

    let profile = serde_json::to_value(&professional)
        .map_err(|e| RecordError::new(ErrorCategory::System, e.to_string()))?;
    ctx.store
        .write(&paths::professional(id), profile)
        .await
        .map_err(|e| RecordError::from(&e))?;

    let schedule = serde_json::json!({
        "professional_id": id,
        "email": email,
        "blocks": [block],
    });
    ctx.store
        .write(&paths::schedules(id), schedule)
        .await
        .map_err(|e| RecordError::from(&e))?;

    Ok(id)
}

/// Re-authenticate the operator after an account creation displaced their
/// session. Failure here never fails the record.
async fn restore_operator_session(ctx: &RecordContext, row_number: usize) {
    if let Err(err) = ctx
        .identity
        .reauthenticate(&ctx.operator.email, &ctx.operator.password)
        .await
    {
        warn!(
            row = row_number,
            error = %err,
            "failed to restore operator session; continuing"
        );
    }
}

fn parse_cadence(value: Option<&str>) -> Cadence {
    match value.map(str::to_lowercase).as_deref() {
        Some("biweekly") => Cadence::Biweekly,
        Some("monthly") => Cadence::Monthly,
        _ => Cadence::Weekly,
    }
}

/// Generate a random initial password: 9 bytes of OS entropy, URL-safe
/// base64 without padding.
fn generate_password() -> String {
    let mut bytes = [0u8; PASSWORD_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_passwords_are_unique_and_long_enough() {
        let a = generate_password();
        let b = generate_password();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_cadence_defaults_to_weekly() {
        assert_eq!(parse_cadence(None), Cadence::Weekly);
        assert_eq!(parse_cadence(Some("Biweekly")), Cadence::Biweekly);
        assert_eq!(parse_cadence(Some("monthly")), Cadence::Monthly);
    }
}
