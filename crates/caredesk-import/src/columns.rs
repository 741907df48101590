//! The spreadsheet column contract.
//!
//! The onboarding template has a fixed header row; headers are mapped to
//! canonical field names through one explicit table instead of scattered
//! string matching. By convention the first data row of the template is a
//! sample and is skipped; real data starts at the third spreadsheet row.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::models::ImportConfig;

/// One column of the onboarding template.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Header as it appears in the spreadsheet.
    pub header: &'static str,
    /// Canonical field name the rest of the pipeline uses.
    pub field: &'static str,
    /// Whether a non-empty value is required per row.
    pub required: bool,
}

/// The 22-column onboarding contract, in template order.
pub const COLUMN_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec { header: "First Name*", field: "first_name", required: true },
    ColumnSpec { header: "Middle Name", field: "middle_name", required: false },
    ColumnSpec { header: "Last Name*", field: "last_name", required: true },
    ColumnSpec { header: "Email*", field: "email", required: true },
    ColumnSpec { header: "Contact Number*", field: "contact_number", required: true },
    ColumnSpec { header: "Gender*", field: "gender", required: true },
    ColumnSpec { header: "Civil Status*", field: "civil_status", required: true },
    ColumnSpec { header: "Date of Birth", field: "date_of_birth", required: false },
    ColumnSpec { header: "Address", field: "address", required: false },
    ColumnSpec { header: "Specialty*", field: "specialty", required: true },
    ColumnSpec { header: "PRC License Number*", field: "license_number", required: true },
    ColumnSpec { header: "PRC Expiry Date*", field: "license_expiry", required: true },
    ColumnSpec { header: "PTR Number", field: "registration_id", required: false },
    ColumnSpec { header: "S2 Number", field: "s2_number", required: false },
    ColumnSpec { header: "Professional Fee*", field: "professional_fee", required: true },
    ColumnSpec { header: "Clinic Name*", field: "clinic_name", required: true },
    ColumnSpec { header: "Room/Unit", field: "room", required: false },
    ColumnSpec { header: "Schedule Days*", field: "schedule_days", required: true },
    ColumnSpec { header: "Start Time*", field: "start_time", required: true },
    ColumnSpec { header: "End Time*", field: "end_time", required: true },
    ColumnSpec { header: "Schedule Valid From", field: "valid_from", required: false },
    ColumnSpec { header: "Cadence", field: "cadence", required: false },
];

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One decoded data row, keyed by canonical field names.
#[derive(Debug, Clone)]
pub struct ImportRow {
    /// 1-based spreadsheet row number (header = 1).
    pub row_number: usize,
    fields: HashMap<String, String>,
}

impl ImportRow {
    /// Build a row from canonical `(field, value)` pairs.
    #[must_use]
    pub fn from_pairs(row_number: usize, pairs: &[(&str, &str)]) -> Self {
        Self {
            row_number,
            fields: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Trimmed, non-empty value of a canonical field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required-field accessor for use after validation has passed.
    pub(crate) fn require(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(UTF8_BOM) {
        &data[UTF8_BOM.len()..]
    } else {
        data
    }
}

/// Normalize a header for matching: trim, lowercase, drop the `*` marker.
fn normalize_header(header: &str) -> String {
    header.trim().trim_end_matches('*').trim().to_lowercase()
}

/// Decode spreadsheet bytes (CSV export) into [`ImportRow`]s.
///
/// Headers are matched case-insensitively against [`COLUMN_SCHEMA`]
/// (the `*` required-marker is ignored for matching); unknown columns are
/// ignored. Fails if any required column header is absent or the file has
/// no data rows. Per-row problems are *not* reported here; rows are
/// decoded as-is and validated later so the run can report them per row.
pub fn decode_rows(data: &[u8], config: &ImportConfig) -> Result<Vec<ImportRow>, EngineError> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::Decode(format!("failed to read header row: {e}")))?
        .iter()
        .map(ToString::to_string)
        .collect();

    // field -> column index
    let mut field_index: HashMap<&'static str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        let normalized = normalize_header(header);
        if let Some(spec) = COLUMN_SCHEMA
            .iter()
            .find(|s| normalize_header(s.header) == normalized)
        {
            field_index.insert(spec.field, idx);
        }
    }

    let missing: Vec<&str> = COLUMN_SCHEMA
        .iter()
        .filter(|s| s.required && !field_index.contains_key(s.field))
        .map(|s| s.header)
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::MissingColumns(missing.join(", ")));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is spreadsheet row 1; first data record is row 2.
        let row_number = idx + 2;
        if config.skip_sample_row && idx == 0 {
            continue;
        }
        let record = result
            .map_err(|e| EngineError::Decode(format!("failed to parse row {row_number}: {e}")))?;

        let mut fields = HashMap::new();
        for (field, &col) in &field_index {
            if let Some(value) = record.get(col) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    fields.insert((*field).to_string(), trimmed.to_string());
                }
            }
        }
        rows.push(ImportRow { row_number, fields });
    }

    if rows.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    Ok(rows)
}
