//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services,
//! so request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_PATIENT_DATA_FILE;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if the path is empty or names an existing directory.
    pub fn new(patient_data_file: PathBuf) -> PatientResult<Self> {
        if patient_data_file.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "patient data file path cannot be empty".into(),
            ));
        }
        if patient_data_file.is_dir() {
            return Err(PatientError::InvalidInput(format!(
                "patient data file path is a directory: {}",
                patient_data_file.display()
            )));
        }

        Ok(Self { patient_data_file })
    }

    pub fn patient_data_file(&self) -> &Path {
        &self.patient_data_file
    }
}

/// Resolve the patient data file from an optional override value.
///
/// `None`, empty or whitespace-only values fall back to [`DEFAULT_PATIENT_DATA_FILE`].
pub fn patient_data_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATIENT_DATA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_rejects_empty_path() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty path should fail");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = CoreConfig::new(temp_dir.path().to_path_buf())
            .expect_err("directory should fail");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn test_new_accepts_file_that_does_not_exist_yet() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patient.json");
        let cfg = CoreConfig::new(path.clone()).expect("CoreConfig::new should succeed");
        assert_eq!(cfg.patient_data_file(), path);
    }

    #[test]
    fn test_env_value_falls_back_to_default() {
        assert_eq!(
            patient_data_file_from_env_value(None),
            PathBuf::from(DEFAULT_PATIENT_DATA_FILE)
        );
        assert_eq!(
            patient_data_file_from_env_value(Some("  ".into())),
            PathBuf::from(DEFAULT_PATIENT_DATA_FILE)
        );
        assert_eq!(
            patient_data_file_from_env_value(Some(" data/p.json ".into())),
            PathBuf::from("data/p.json")
        );
    }
}
