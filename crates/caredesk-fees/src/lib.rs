//! # caredesk-fees
//!
//! Reconciliation of pending fee-change requests embedded in professional
//! records. A request is a marker on the record itself, not a separate
//! collection; reviewing it means promoting exactly one of the marker's
//! two fees (requested on approval, previous on rejection) to the
//! record's authoritative fee and moving the marker out of `pending`.
//!
//! The store offers no multi-path transactions, so a review commits with
//! one profile write; the audit entry and the doctor notification after
//! it are best-effort.

pub mod error;
pub mod models;
pub mod service;

pub use error::FeeError;
pub use models::{BulkOutcome, FeeChangeRequest, ReviewAction, ReviewDecision};
pub use service::FeeRequestService;
