//! Constants used throughout the PMR core crate.

/// Default location of the patient record file when no explicit path is configured.
pub const DEFAULT_PATIENT_DATA_FILE: &str = "patient.json";

/// Environment variable naming the patient record file.
pub const PATIENT_DATA_FILE_ENV: &str = "PATIENT_DATA_FILE";
