//! Which fields of each stored record kind are sensitive.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sensitive fields of a patient health record.
pub const HEALTH_RECORD_FIELDS: &[&str] = &["diagnosis_description", "notes"];

/// Sensitive fields of a prescription.
pub const PRESCRIPTION_FIELDS: &[&str] = &["notes"];

/// Sensitive fields of a vital-signs reading.
pub const VITAL_SIGNS_FIELDS: &[&str] = &["notes"];

/// A kind of record whose sensitive fields are encrypted at rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    HealthRecord,
    Prescription,
    VitalSigns,
}

/// Error returned when parsing an unknown record kind name.
#[derive(Debug, Error)]
#[error("unknown record kind: {0}")]
pub struct UnknownRecordKind(pub String);

impl RecordKind {
    /// Every built-in kind.
    pub const ALL: [RecordKind; 3] = [
        RecordKind::HealthRecord,
        RecordKind::Prescription,
        RecordKind::VitalSigns,
    ];

    /// The fields of this kind that must be encrypted before storage.
    pub fn sensitive_fields(self) -> &'static [&'static str] {
        match self {
            RecordKind::HealthRecord => HEALTH_RECORD_FIELDS,
            RecordKind::Prescription => PRESCRIPTION_FIELDS,
            RecordKind::VitalSigns => VITAL_SIGNS_FIELDS,
        }
    }

    /// Snake-case name, as used in headers and policy files.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::HealthRecord => "health_record",
            RecordKind::Prescription => "prescription",
            RecordKind::VitalSigns => "vital_signs",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownRecordKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RecordKind::VitalSigns).unwrap();
        assert_eq!(json, "\"vital_signs\"");
        let kind: RecordKind = serde_json::from_str("\"health_record\"").unwrap();
        assert_eq!(kind, RecordKind::HealthRecord);
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = "lab_result".parse::<RecordKind>().unwrap_err();
        assert!(err.to_string().contains("lab_result"));
    }

    #[test]
    fn every_kind_protects_notes() {
        for kind in RecordKind::ALL {
            assert!(kind.sensitive_fields().contains(&"notes"), "{kind}");
        }
    }

    #[test]
    fn health_record_protects_diagnosis_text() {
        assert!(RecordKind::HealthRecord
            .sensitive_fields()
            .contains(&"diagnosis_description"));
    }
}
