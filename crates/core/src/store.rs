//! Persistence for the record set.
//!
//! The whole record set is read and written as one unit. [`RecordStore`] is the seam
//! between record logic and storage mechanics; [`JsonFileStore`] is the production
//! backend and [`InMemoryStore`] backs tests and embedded use.
//!
//! ## On-disk layout
//!
//! A single JSON object whose keys are patient ids and whose values are field-blobs:
//!
//! ```text
//! {
//!   "P001": { "name": "Asha", "city": "Pune", "age": 30, "gender": "female",
//!             "height": 1.6, "weight": 50.0 }
//! }
//! ```
//!
//! Derived fields (`bmi`, `verdict`) and the id itself never appear inside a blob.

use crate::error::{PatientError, PatientResult};
use crate::patient::PatientRecord;
use pmr_types::PatientId;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// The complete persisted state: id to field-blob, iterated in ascending id order.
pub type RecordSet = BTreeMap<PatientId, PatientRecord>;

/// Whole-set persistence collaborator.
pub trait RecordStore: Send + Sync {
    /// Returns the current record set.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if the backing store cannot be read or does not decode
    /// into valid records.
    fn load(&self) -> PatientResult<RecordSet>;

    /// Replaces the stored record set with `records`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if the record set cannot be encoded or written.
    fn save(&self, records: &RecordSet) -> PatientResult<()>;
}

/// Stores the record set as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> PatientResult<RecordSet> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    "patient file {} does not exist yet, starting empty",
                    self.path.display()
                );
                return Ok(RecordSet::new());
            }
            Err(e) => return Err(PatientError::FileRead(e)),
        };

        if contents.trim().is_empty() {
            return Ok(RecordSet::new());
        }

        let records: RecordSet =
            serde_json::from_str(&contents).map_err(PatientError::Deserialization)?;
        tracing::debug!(
            "loaded {} patients from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save(&self, records: &RecordSet) -> PatientResult<()> {
        let json = serde_json::to_vec_pretty(records).map_err(PatientError::Serialization)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PatientError::FileWrite)?;
        }

        // Write beside the target and rename over it so readers never see a partial file.
        let temp_path = self.temp_path();
        if let Err(e) =
            write_synced(&temp_path, &json).and_then(|()| fs::rename(&temp_path, &self.path))
        {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        "failed to remove {}: {}",
                        temp_path.display(),
                        cleanup
                    );
                }
            }
            return Err(PatientError::FileWrite(e));
        }

        tracing::debug!("saved {} patients to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Keeps the record set in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<RecordSet>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self) -> PatientResult<RecordSet> {
        let records = self.records.read().map_err(|_| PatientError::LockPoisoned)?;
        Ok(records.clone())
    }

    fn save(&self, records: &RecordSet) -> PatientResult<()> {
        let mut stored = self
            .records
            .write()
            .map_err(|_| PatientError::LockPoisoned)?;
        *stored = records.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::PatientFields;
    use tempfile::TempDir;

    fn sample_set() -> RecordSet {
        let record = PatientFields {
            name: "Asha".into(),
            city: "Pune".into(),
            age: 30,
            gender: "female".into(),
            height: 1.6,
            weight: 50.0,
        }
        .validate()
        .expect("fixture should be valid");

        let mut records = RecordSet::new();
        records.insert(PatientId::new("P001").unwrap(), record);
        records
    }

    #[test]
    fn test_load_missing_file_returns_empty_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patient.json"));

        let records = store.load().expect("load should succeed");
        assert!(records.is_empty());
    }

    #[test]
    fn test_save_then_load_returns_same_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("patient.json"));

        store.save(&sample_set()).expect("save should succeed");
        let loaded = store.load().expect("load should succeed");

        assert_eq!(loaded, sample_set());
        assert!(
            !store.temp_path().exists(),
            "temporary file should be renamed away"
        );
    }

    #[test]
    fn test_saved_file_has_flat_layout_without_derived_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patient.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample_set()).expect("save should succeed");

        let raw = fs::read_to_string(&path).expect("should read patient file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("should be JSON");
        let blob = value["P001"].as_object().expect("P001 should be an object");

        assert_eq!(blob.len(), 6);
        assert!(!blob.contains_key("id"));
        assert!(!blob.contains_key("bmi"));
        assert!(!blob.contains_key("verdict"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patient.json");
        fs::write(&path, "{ not json").expect("should write file");

        let err = JsonFileStore::new(&path)
            .load()
            .expect_err("malformed file should fail");
        assert!(matches!(err, PatientError::Deserialization(_)));
    }

    #[test]
    fn test_load_rejects_invalid_stored_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patient.json");
        fs::write(
            &path,
            r#"{"P001":{"name":"A","city":"B","age":30,"gender":"male","height":0,"weight":60}}"#,
        )
        .expect("should write file");

        let err = JsonFileStore::new(&path)
            .load()
            .expect_err("zero height should fail");
        assert!(matches!(err, PatientError::Deserialization(_)));
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let err = JsonFileStore::new(temp_dir.path())
            .load()
            .expect_err("directory should not be readable as a file");
        assert!(matches!(err, PatientError::FileRead(_)));
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patient.json");
        fs::create_dir(&path).expect("should create directory at target path");
        let store = JsonFileStore::new(&path);

        let err = store
            .save(&sample_set())
            .expect_err("renaming over a directory should fail");

        assert!(matches!(err, PatientError::FileWrite(_)));
        assert!(
            !store.temp_path().exists(),
            "temporary file should be cleaned up"
        );
        assert!(path.is_dir(), "target should be left as it was");
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        store.save(&sample_set()).expect("save should succeed");
        assert_eq!(store.load().unwrap(), sample_set());
    }
}
