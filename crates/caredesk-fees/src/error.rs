//! Errors of the fee-request workflow.

use caredesk_core::ProfessionalId;
use caredesk_store::StoreError;
use thiserror::Error;

/// Failures while reconciling fee requests.
#[derive(Debug, Error)]
pub enum FeeError {
    /// No professional record exists at the given id.
    #[error("professional {0} not found")]
    DoctorNotFound(ProfessionalId),

    /// The record has no fee-change request in `pending` state.
    #[error("professional {0} has no pending fee-change request")]
    NoPendingRequest(ProfessionalId),

    /// The stored record could not be parsed.
    #[error("professional {id} record is malformed: {message}")]
    Malformed {
        id: ProfessionalId,
        message: String,
    },

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
