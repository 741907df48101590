//! Error taxonomy for the import run.
//!
//! Per-record failures are classified into a small set of categories; the
//! category decides whether the record is automatically retried (only
//! `Network` is) and is surfaced in the run report so operators know what
//! to fix. Classification prefers the structured error kinds on the
//! collaborator errors and falls back to a substring table for opaque
//! upstream messages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use caredesk_store::{IdentityError, StoreError};

/// Category of a per-record import failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Bad, missing, or malformed input. Not retryable.
    Validation,
    /// Transient transport or rate-limit failure. Retryable.
    Network,
    /// Email collision with an existing account or record. Not retryable.
    Duplicate,
    /// Authorization failure against identity or store. Not retryable.
    Permission,
    /// Unclassified fallback, including whole-batch failures. Not
    /// automatically retried.
    System,
}

impl ErrorCategory {
    /// Whether the retry loop should attempt this failure again.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorCategory::Network)
    }

    /// Lowercase label used in reports and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Network => "network",
            ErrorCategory::Duplicate => "duplicate",
            ErrorCategory::Permission => "permission",
            ErrorCategory::System => "system",
        }
    }
}

/// Substring patterns for classifying opaque error messages, checked in
/// order against the lowercased message. First match wins.
pub const CLASSIFICATION_PATTERNS: &[(&str, ErrorCategory)] = &[
    ("network", ErrorCategory::Network),
    ("timeout", ErrorCategory::Network),
    ("timed out", ErrorCategory::Network),
    ("unavailable", ErrorCategory::Network),
    ("rate limit", ErrorCategory::Network),
    ("too many requests", ErrorCategory::Network),
    ("connection", ErrorCategory::Network),
    ("already in use", ErrorCategory::Duplicate),
    ("already exists", ErrorCategory::Duplicate),
    ("duplicate", ErrorCategory::Duplicate),
    ("permission", ErrorCategory::Permission),
    ("unauthorized", ErrorCategory::Permission),
    ("denied", ErrorCategory::Permission),
    ("invalid", ErrorCategory::Validation),
    ("required", ErrorCategory::Validation),
    ("malformed", ErrorCategory::Validation),
];

/// Classify an opaque error message through [`CLASSIFICATION_PATTERNS`].
#[must_use]
pub fn classify_message(message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();
    for (pattern, category) in CLASSIFICATION_PATTERNS {
        if lowered.contains(pattern) {
            return *category;
        }
    }
    ErrorCategory::System
}

/// Classify an identity-provider error by its structured kind.
#[must_use]
pub fn classify_identity(err: &IdentityError) -> ErrorCategory {
    match err {
        IdentityError::Unavailable { .. } | IdentityError::RateLimited { .. } => {
            ErrorCategory::Network
        }
        IdentityError::EmailAlreadyInUse { .. } => ErrorCategory::Duplicate,
        IdentityError::AuthenticationFailed | IdentityError::PermissionDenied { .. } => {
            ErrorCategory::Permission
        }
        IdentityError::InvalidData { .. } => ErrorCategory::Validation,
        IdentityError::Operation { message } => classify_message(message),
    }
}

/// Classify a document-store error by its structured kind.
#[must_use]
pub fn classify_store(err: &StoreError) -> ErrorCategory {
    match err {
        StoreError::Unavailable { .. } | StoreError::Timeout { .. } => ErrorCategory::Network,
        StoreError::PermissionDenied { .. } => ErrorCategory::Permission,
        StoreError::InvalidData { .. } => ErrorCategory::Validation,
        StoreError::Operation { message } => classify_message(message),
    }
}

/// Internal per-record failure: the classification plus what happened.
#[derive(Debug, Clone)]
pub struct RecordError {
    pub category: ErrorCategory,
    pub message: String,
}

impl RecordError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Duplicate, message)
    }
}

impl From<&IdentityError> for RecordError {
    fn from(err: &IdentityError) -> Self {
        Self::new(classify_identity(err), err.to_string())
    }
}

impl From<&StoreError> for RecordError {
    fn from(err: &StoreError) -> Self {
        Self::new(classify_store(err), err.to_string())
    }
}

/// One entry of the run report's error list.
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    /// 1-based spreadsheet row number.
    pub row: usize,
    /// Human-readable failure description.
    pub error: String,
    /// Whether re-submitting this row is worthwhile without fixing it.
    pub retryable: bool,
    /// 1-based batch number the row was processed in.
    pub batch: usize,
    /// Failure category.
    #[serde(rename = "errorType")]
    pub category: ErrorCategory,
    pub timestamp: DateTime<Utc>,
}

/// Pre-flight failures — the only errors `run_import` returns to its
/// caller. Everything after pre-flight is captured in the report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input had no data rows.
    #[error("import input contains no data rows")]
    EmptyInput,

    /// The operator credential was missing or blank.
    #[error("operator credential is required to run an import")]
    MissingOperatorCredential,

    /// The input bytes could not be decoded.
    #[error("failed to decode import input: {0}")]
    Decode(String),

    /// Required template columns are absent.
    #[error("missing required columns: {0}")]
    MissingColumns(String),

    /// The clinic directory or professionals collection could not be read
    /// before the run started.
    #[error("pre-flight read failed: {0}")]
    Preflight(#[from] StoreError),
}
