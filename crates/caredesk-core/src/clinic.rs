//! Clinic records.

use serde::{Deserialize, Serialize};

use crate::ids::ClinicId;

/// A clinic a professional can be affiliated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    pub id: ClinicId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Clinic {
    /// Case-insensitive exact name match, the lookup rule the import uses.
    #[must_use]
    pub fn name_matches(&self, candidate: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(candidate.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_case_insensitive() {
        let clinic = Clinic {
            id: ClinicId::new(),
            name: "St. Luke's Medical Center".to_string(),
            address: None,
        };
        assert!(clinic.name_matches("st. luke's medical center"));
        assert!(clinic.name_matches("  ST. LUKE'S MEDICAL CENTER "));
        assert!(!clinic.name_matches("St. Luke"));
    }
}
