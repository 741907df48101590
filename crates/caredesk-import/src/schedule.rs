//! Schedule materialization: weekday parsing and slot-template generation.

use caredesk_core::{SlotStatus, SlotTemplateEntry};
use thiserror::Error;

/// Slot length; the template walk advances in these increments.
pub const SLOT_MINUTES: u32 = 30;

/// Failures while materializing a schedule. These abort only the record
/// they belong to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A day token was not a recognized weekday name or abbreviation.
    #[error("unrecognized day '{0}': expected full weekday names or 3-letter abbreviations (e.g. Monday or mon)")]
    UnknownDay(String),

    /// The day list was empty after parsing.
    #[error("schedule days list is empty")]
    EmptyDays,

    /// A time string was not valid 24-hour `HH:MM`.
    #[error("invalid time '{0}': {1}")]
    InvalidTime(String, String),

    /// The start time was not strictly before the end time.
    #[error("start time {0} must be before end time {1}")]
    InvalidRange(String, String),
}

/// Weekday names and abbreviations, indexed 0 = Sunday .. 6 = Saturday.
const WEEKDAYS: &[(&str, &str, u8)] = &[
    ("sunday", "sun", 0),
    ("monday", "mon", 1),
    ("tuesday", "tue", 2),
    ("wednesday", "wed", 3),
    ("thursday", "thu", 4),
    ("friday", "fri", 5),
    ("saturday", "sat", 6),
];

/// Parse a comma-separated weekday list into weekday numbers.
///
/// Accepts full names or 3-letter abbreviations, case-insensitive.
/// Duplicates are collapsed; the result is sorted. An unrecognized token
/// fails the whole list with a descriptive error.
pub fn parse_weekdays(input: &str) -> Result<Vec<u8>, ScheduleError> {
    let mut days = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let lowered = token.to_lowercase();
        let day = WEEKDAYS
            .iter()
            .find(|(full, abbrev, _)| lowered == *full || lowered == *abbrev)
            .map(|(_, _, n)| *n)
            .ok_or_else(|| ScheduleError::UnknownDay(token.to_string()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(ScheduleError::EmptyDays);
    }
    days.sort_unstable();
    Ok(days)
}

/// Parse strict 24-hour `HH:MM` into minutes from midnight.
pub fn parse_hhmm(input: &str) -> Result<u32, ScheduleError> {
    let invalid = |reason: &str| {
        ScheduleError::InvalidTime(input.to_string(), reason.to_string())
    };
    let (h, m) = input
        .split_once(':')
        .ok_or_else(|| invalid("expected HH:MM"))?;
    let hour: u32 = h
        .parse()
        .map_err(|_| invalid("hour is not a number"))?;
    let minute: u32 = m
        .parse()
        .map_err(|_| invalid("minute is not a number"))?;
    if hour > 23 {
        return Err(invalid("hour must be between 0 and 23"));
    }
    if minute > 59 {
        return Err(invalid("minute must be between 0 and 59"));
    }
    Ok(hour * 60 + minute)
}

/// Render minutes-from-midnight as a 12-hour display label, e.g. `9:30 AM`.
#[must_use]
pub fn format_12h(minutes: u32) -> String {
    let hour24 = (minutes / 60) % 24;
    let minute = minutes % 60;
    let period = if hour24 < 12 { "AM" } else { "PM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {period}")
}

/// Render minutes-from-midnight as 24-hour `HH:MM`.
#[must_use]
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Generate the slot template between `start` and `end` (both `HH:MM`).
///
/// Walks in fixed 30-minute increments; the walk terminates strictly
/// before `end`, so no slot starts at or after the declared end time.
pub fn build_slot_template(start: &str, end: &str) -> Result<Vec<SlotTemplateEntry>, ScheduleError> {
    let start_min = parse_hhmm(start)?;
    let end_min = parse_hhmm(end)?;
    if start_min >= end_min {
        return Err(ScheduleError::InvalidRange(
            start.to_string(),
            end.to_string(),
        ));
    }

    let mut slots = Vec::new();
    let mut cursor = start_min;
    while cursor < end_min {
        slots.push(SlotTemplateEntry {
            start: format_hhmm(cursor),
            display: format_12h(cursor),
            default_status: SlotStatus::Available,
            duration_minutes: SLOT_MINUTES,
        });
        cursor += SLOT_MINUTES;
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekdays_mixed_names_and_abbreviations() {
        assert_eq!(parse_weekdays("monday,wed,Fri").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_weekdays("SUN, Saturday").unwrap(), vec![0, 6]);
    }

    #[test]
    fn test_parse_weekdays_collapses_duplicates() {
        assert_eq!(parse_weekdays("mon,Monday,MON").unwrap(), vec![1]);
    }

    #[test]
    fn test_parse_weekdays_unknown_token_is_descriptive() {
        let err = parse_weekdays("monday,funday").unwrap_err();
        assert_eq!(err, ScheduleError::UnknownDay("funday".to_string()));
        assert!(err.to_string().contains("funday"));
    }

    #[test]
    fn test_parse_weekdays_empty_list() {
        assert_eq!(parse_weekdays(" , ").unwrap_err(), ScheduleError::EmptyDays);
    }

    #[test]
    fn test_parse_hhmm_bounds() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("23:59").unwrap(), 23 * 60 + 59);
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("16:60").is_err());
        assert!(parse_hhmm("9").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    #[test]
    fn test_slot_template_boundary() {
        let slots = build_slot_template("09:00", "17:00").unwrap();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].start, "09:00");
        assert_eq!(slots[0].display, "9:00 AM");
        assert_eq!(slots[1].start, "09:30");
        assert_eq!(slots.last().unwrap().start, "16:30");
        assert_eq!(slots.last().unwrap().display, "4:30 PM");
        // No slot starts at or after the declared end time.
        assert!(slots.iter().all(|s| parse_hhmm(&s.start).unwrap() < 17 * 60));
        assert!(slots
            .iter()
            .all(|s| s.duration_minutes == 30 && s.default_status == SlotStatus::Available));
    }

    #[test]
    fn test_slot_template_uneven_end_never_overruns() {
        // 09:00 -> 10:15 yields 09:00, 09:30, 10:00 (10:30 would overrun).
        let slots = build_slot_template("09:00", "10:15").unwrap();
        let starts: Vec<&str> = slots.iter().map(|s| s.start.as_str()).collect();
        assert_eq!(starts, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_slot_template_rejects_inverted_range() {
        assert!(matches!(
            build_slot_template("17:00", "09:00"),
            Err(ScheduleError::InvalidRange(..))
        ));
        assert!(matches!(
            build_slot_template("09:00", "09:00"),
            Err(ScheduleError::InvalidRange(..))
        ));
    }

    #[test]
    fn test_format_12h_edges() {
        assert_eq!(format_12h(0), "12:00 AM");
        assert_eq!(format_12h(12 * 60), "12:00 PM");
        assert_eq!(format_12h(13 * 60 + 30), "1:30 PM");
    }
}
