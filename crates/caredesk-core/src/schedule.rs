//! Schedule blocks and slot templates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::ClinicId;

/// Recurrence cadence of a schedule block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    #[default]
    Weekly,
    Biweekly,
    Monthly,
}

/// Default availability of a generated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    #[default]
    Available,
    Blocked,
}

/// One entry of a slot template: a bookable time-of-day within the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTemplateEntry {
    /// 24-hour `HH:MM` start time.
    pub start: String,
    /// 12-hour display label, e.g. `9:30 AM`.
    pub display: String,
    pub default_status: SlotStatus,
    pub duration_minutes: u32,
}

/// A recurring clinic schedule owned by exactly one professional.
///
/// Created atomically with its owning professional during import and
/// independently editable afterward. Slot starts are `HH:MM` and strictly
/// before the block's declared end time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub clinic_id: ClinicId,
    /// Room or unit label inside the clinic.
    pub room: String,
    /// Weekday numbers, 0 = Sunday .. 6 = Saturday.
    pub weekdays: Vec<u8>,
    #[serde(default)]
    pub cadence: Cadence,
    pub slots: Vec<SlotTemplateEntry>,
    pub valid_from: NaiveDate,
}
