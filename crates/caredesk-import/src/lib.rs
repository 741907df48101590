//! # caredesk-import
//!
//! Batch import engine for onboarding specialist doctors from spreadsheet
//! data. One run turns tabular rows into an identity, a profile record,
//! and a schedule record per doctor, with:
//!
//! - an explicit 22-column header schema and typed row mapping;
//! - pure per-row validation (presence, formats, enumerations, ranges);
//! - fixed-size batches processed sequentially, records within a batch
//!   fanned out with pacing delays to avoid bursting the identity provider;
//! - per-record retry with exponential backoff for network-classified
//!   failures only;
//! - partial-failure bookkeeping: a failed record never blocks or rolls
//!   back other records, and the run always produces a full report.
//!
//! # Example
//!
//! ```rust,ignore
//! use caredesk_import::{decode_rows, ImportConfig, ImportEngine, OperatorCredential};
//!
//! let rows = decode_rows(&csv_bytes, &ImportConfig::default())?;
//! let engine = ImportEngine::new(store, identity, ImportConfig::default());
//! let report = engine.run_import(rows, &operator).await?;
//! println!("{} ok, {} failed", report.successful, report.failed);
//! ```

pub mod columns;
pub mod engine;
pub mod error;
pub mod models;
pub mod retry;
pub mod schedule;
pub mod validation;

pub use columns::{decode_rows, ImportRow, COLUMN_SCHEMA};
pub use engine::ImportEngine;
pub use error::{classify_message, ErrorCategory, EngineError, ImportFailure};
pub use models::{
    BatchResult, BatchSummary, ImportConfig, IssuedCredential, OperatorCredential,
};
pub use retry::RetryConfig;
pub use validation::{validate_row, FieldError, ValidationResult};
