//! Pure per-row validation.
//!
//! `validate_row` never mutates state and never fails as a function: it
//! always returns a [`ValidationResult`], and the engine converts a
//! negative result into a non-retryable `validation` failure.

use chrono::NaiveDate;

use crate::columns::{ImportRow, COLUMN_SCHEMA};
use crate::schedule::parse_hhmm;

/// Accepted gender values (case-insensitive).
pub const GENDERS: &[&str] = &["male", "female", "other"];

/// Accepted civil-status values (case-insensitive).
pub const CIVIL_STATUSES: &[&str] = &["single", "married", "widowed", "separated", "divorced"];

/// Accepted cadence values (case-insensitive).
pub const CADENCES: &[&str] = &["weekly", "biweekly", "monthly"];

/// Professional-fee bounds, inclusive.
pub const FEE_RANGE: (f64, f64) = (0.0, 100_000.0);

const MIN_NAME_LENGTH: usize = 2;
const MIN_LICENSE_LENGTH: usize = 5;
const MAX_EMAIL_LENGTH: usize = 254;

/// One field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Canonical field name.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating one row.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// All error messages joined for a report line.
    #[must_use]
    pub fn joined_errors(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Practical email format check.
fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "exceeds maximum length of {MAX_EMAIL_LENGTH} characters"
        ));
    }
    if email.contains(char::is_whitespace) {
        return Err("contains whitespace".to_string());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("must contain exactly one '@'".to_string());
    };
    if domain.contains('@') {
        return Err("must contain exactly one '@'".to_string());
    }
    if local.is_empty() {
        return Err("local part is empty".to_string());
    }
    if domain.is_empty() || !domain.contains('.') {
        return Err("domain must contain at least one '.'".to_string());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err("domain cannot start or end with '.'".to_string());
    }
    Ok(())
}

/// Phone check: optional leading `+`, digits with spaces/dashes/parens,
/// at least 7 digits.
fn validate_phone(phone: &str) -> Result<(), String> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let acceptable = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    if !acceptable {
        return Err("contains characters other than digits, +, spaces, dashes".to_string());
    }
    if digits < 7 {
        return Err("must contain at least 7 digits".to_string());
    }
    Ok(())
}

/// Parse a date as `YYYY-MM-DD`, warn-accepting `MM/DD/YYYY`.
pub(crate) fn parse_date(value: &str) -> Result<(NaiveDate, Option<String>), String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok((date, None));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%m/%d/%Y") {
        return Ok((
            date,
            Some(format!("date '{value}' parsed as MM/DD/YYYY; prefer YYYY-MM-DD")),
        ));
    }
    Err(format!("'{value}' is not a date (expected YYYY-MM-DD)"))
}

fn enum_check(value: &str, allowed: &[&str]) -> bool {
    let lowered = value.to_lowercase();
    allowed.contains(&lowered.as_str())
}

/// Validate one decoded row. Pure; always returns a result.
#[must_use]
pub fn validate_row(row: &ImportRow, row_number: usize) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut err = |field: &str, message: String| {
        errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    };

    // Required-field presence per the column table.
    for spec in COLUMN_SCHEMA.iter().filter(|s| s.required) {
        if row.get(spec.field).is_none() {
            err(spec.field, format!("required field '{}' is missing or empty", spec.header));
        }
    }

    if let Some(email) = row.get("email") {
        if let Err(reason) = validate_email(email) {
            err("email", reason);
        }
    }

    if let Some(phone) = row.get("contact_number") {
        if let Err(reason) = validate_phone(phone) {
            err("contact_number", reason);
        }
    }

    for field in ["first_name", "last_name"] {
        if let Some(name) = row.get(field) {
            if name.len() < MIN_NAME_LENGTH {
                err(field, format!("must be at least {MIN_NAME_LENGTH} characters"));
            }
        }
    }

    if let Some(gender) = row.get("gender") {
        if !enum_check(gender, GENDERS) {
            err("gender", format!("'{gender}' is not one of: {}", GENDERS.join(", ")));
        }
    }

    if let Some(status) = row.get("civil_status") {
        if !enum_check(status, CIVIL_STATUSES) {
            err(
                "civil_status",
                format!("'{status}' is not one of: {}", CIVIL_STATUSES.join(", ")),
            );
        }
    }

    if let Some(cadence) = row.get("cadence") {
        if !enum_check(cadence, CADENCES) {
            err("cadence", format!("'{cadence}' is not one of: {}", CADENCES.join(", ")));
        }
    }

    if let Some(license) = row.get("license_number") {
        if license.len() < MIN_LICENSE_LENGTH {
            err(
                "license_number",
                format!("must be at least {MIN_LICENSE_LENGTH} characters"),
            );
        }
    }

    for field in ["license_expiry", "date_of_birth", "valid_from"] {
        if let Some(value) = row.get(field) {
            match parse_date(value) {
                Ok((_, Some(warning))) => warnings.push(format!("row {row_number}, {field}: {warning}")),
                Ok((_, None)) => {}
                Err(reason) => err(field, reason),
            }
        }
    }

    if let Some(fee) = row.get("professional_fee") {
        match fee.replace(',', "").parse::<f64>() {
            Ok(value) if (FEE_RANGE.0..=FEE_RANGE.1).contains(&value) => {}
            Ok(value) => err(
                "professional_fee",
                format!("{value} is outside the allowed range {}..={}", FEE_RANGE.0, FEE_RANGE.1),
            ),
            Err(_) => err("professional_fee", format!("'{fee}' is not a number")),
        }
    }

    // Time fields must be strict 24-hour HH:MM before slot generation is
    // ever attempted.
    let mut start_min = None;
    let mut end_min = None;
    if let Some(start) = row.get("start_time") {
        match parse_hhmm(start) {
            Ok(minutes) => start_min = Some(minutes),
            Err(reason) => err("start_time", reason.to_string()),
        }
    }
    if let Some(end) = row.get("end_time") {
        match parse_hhmm(end) {
            Ok(minutes) => end_min = Some(minutes),
            Err(reason) => err("end_time", reason.to_string()),
        }
    }
    if let (Some(start), Some(end)) = (start_min, end_min) {
        if start >= end {
            err("start_time", "start time must be before end time".to_string());
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("first_name", "Juan"),
            ("middle_name", "Luna"),
            ("last_name", "Cruz"),
            ("email", "juan.cruz@example.com"),
            ("contact_number", "+63 917 555 0100"),
            ("gender", "Male"),
            ("civil_status", "Single"),
            ("date_of_birth", "1980-04-12"),
            ("address", "Manila"),
            ("specialty", "Cardiology"),
            ("license_number", "1234567"),
            ("license_expiry", "2030-06-30"),
            ("registration_id", "PTR-9"),
            ("s2_number", "S2-4"),
            ("professional_fee", "2000"),
            ("clinic_name", "Heart Center"),
            ("room", "Room 204"),
            ("schedule_days", "monday,wed,Fri"),
            ("start_time", "09:00"),
            ("end_time", "17:00"),
            ("valid_from", "2026-09-01"),
            ("cadence", "weekly"),
        ]
    }

    fn row_with(overrides: &[(&str, &str)]) -> ImportRow {
        let mut pairs = valid_pairs();
        for (field, value) in overrides {
            pairs.retain(|(f, _)| f != field);
            if !value.is_empty() {
                pairs.push((field, value));
            }
        }
        ImportRow::from_pairs(3, &pairs)
    }

    #[test]
    fn test_fully_valid_row_has_no_errors() {
        let result = validate_row(&row_with(&[]), 3);
        assert!(result.is_valid, "errors: {}", result.joined_errors());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_required_field_names_the_field() {
        let result = validate_row(&row_with(&[("email", "")]), 3);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));
        assert!(result.joined_errors().contains("Email*"));
    }

    #[test]
    fn test_every_required_column_is_enforced() {
        for spec in COLUMN_SCHEMA.iter().filter(|s| s.required) {
            let result = validate_row(&row_with(&[(spec.field, "")]), 3);
            assert!(
                result.errors.iter().any(|e| e.field == spec.field),
                "missing {} not reported",
                spec.field
            );
        }
    }

    #[test]
    fn test_bad_email_rejected() {
        for bad in ["not-an-email", "a@b", "user @example.com", "a@.example.com"] {
            let result = validate_row(&row_with(&[("email", bad)]), 3);
            assert!(!result.is_valid, "{bad} accepted");
        }
    }

    #[test]
    fn test_bad_phone_rejected() {
        let result = validate_row(&row_with(&[("contact_number", "call me")]), 3);
        assert!(result.errors.iter().any(|e| e.field == "contact_number"));
        let result = validate_row(&row_with(&[("contact_number", "12345")]), 3);
        assert!(result.errors.iter().any(|e| e.field == "contact_number"));
    }

    #[test]
    fn test_malformed_times_rejected_before_slot_generation() {
        for (field, bad) in [("start_time", "25:00"), ("end_time", "16:60")] {
            let result = validate_row(&row_with(&[(field, bad)]), 3);
            assert!(
                result.errors.iter().any(|e| e.field == field),
                "{bad} accepted for {field}"
            );
        }
    }

    #[test]
    fn test_inverted_time_range_rejected() {
        let result = validate_row(&row_with(&[("start_time", "17:00"), ("end_time", "09:00")]), 3);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("before end time")));
    }

    #[test]
    fn test_enumerations_case_insensitive() {
        assert!(validate_row(&row_with(&[("gender", "FEMALE")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("gender", "unknown")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("civil_status", "complicated")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("cadence", "fortnightly")]), 3).is_valid);
    }

    #[test]
    fn test_fee_range() {
        assert!(validate_row(&row_with(&[("professional_fee", "0")]), 3).is_valid);
        assert!(validate_row(&row_with(&[("professional_fee", "100000")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("professional_fee", "100001")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("professional_fee", "-5")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("professional_fee", "cheap")]), 3).is_valid);
    }

    #[test]
    fn test_slash_dates_accepted_with_warning() {
        let result = validate_row(&row_with(&[("license_expiry", "06/30/2030")]), 3);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("license_expiry"));
    }

    #[test]
    fn test_short_names_and_licenses_rejected() {
        assert!(!validate_row(&row_with(&[("first_name", "J")]), 3).is_valid);
        assert!(!validate_row(&row_with(&[("license_number", "123")]), 3).is_valid);
    }
}
