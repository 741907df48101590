//! # caredesk-core
//!
//! Domain types shared across the caredesk admin portal: strongly-typed
//! identifiers, professional profiles with embedded schedule blocks and
//! fee-change markers, and clinic records.
//!
//! These types are persisted as JSON subtrees in a key-path document
//! store, so everything here derives serde and tolerates absent optional
//! fields on deserialization.

pub mod clinic;
pub mod ids;
pub mod professional;
pub mod schedule;

pub use clinic::Clinic;
pub use ids::{ClinicId, ParseIdError, ProfessionalId};
pub use professional::{
    FeeChangeMarker, FeeStatus, Professional, VerificationStatus,
};
pub use schedule::{Cadence, ScheduleBlock, SlotStatus, SlotTemplateEntry};
