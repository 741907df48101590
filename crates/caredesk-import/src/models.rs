//! Run configuration and the report an import run produces.

use std::time::Duration;

use serde::Serialize;

use crate::error::ImportFailure;
use crate::retry::RetryConfig;

/// Credential of the admin driving the import.
///
/// Needed because account creation displaces the operator's session; the
/// engine re-authenticates with this credential after every creation.
#[derive(Debug, Clone)]
pub struct OperatorCredential {
    pub email: String,
    pub password: String,
}

impl OperatorCredential {
    /// Create an operator credential.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

/// Engine tuning knobs. Defaults match the portal's production pacing.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Records per batch; batches run strictly sequentially.
    pub batch_size: usize,
    /// Pacing delay before record *i* of a batch (i × stagger).
    pub record_stagger: Duration,
    /// Pause between batches.
    pub batch_pause: Duration,
    /// Backoff policy for network-classified failures.
    pub retry: RetryConfig,
    /// Skip the template's conventional sample row (first data row).
    pub skip_sample_row: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            record_stagger: Duration::from_millis(500),
            batch_pause: Duration::from_secs(2),
            retry: RetryConfig::default(),
            skip_sample_row: true,
        }
    }
}

/// Plaintext credential issued for a successfully created account.
///
/// Surfaced once in the run report; the report is the only record of it.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    pub email: String,
    pub password: String,
}

/// Per-batch outcome summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// 1-based batch number.
    pub batch: usize,
    pub successful: usize,
    pub failed: usize,
    /// Failure messages from this batch.
    pub messages: Vec<String>,
}

/// Aggregate result of one import run.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<ImportFailure>,
    pub batch_summaries: Vec<BatchSummary>,
    pub credentials: Vec<IssuedCredential>,
}

impl BatchResult {
    /// Whether every record committed.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0 && self.successful == self.total
    }
}
