//! Patient record operations.
//!
//! [`PatientService`] implements create, view, list, sort, update and delete over a
//! [`RecordStore`]. Every operation loads the full record set fresh; mutating operations
//! then write the full set back before returning. There is no cache between calls.
//!
//! ## Lookup ids
//!
//! `create` stores the id exactly as given. `view`, `update` and `delete` canonicalise the
//! id first (see [`PatientId::canonical`]), so only keys already in canonical form can be
//! reached through them.
//!
//! ## Concurrency
//!
//! Mutations hold a service-wide write lock across load, change and save. Clones of a
//! service share the lock, so concurrent mutations in one process run one at a time and
//! cannot overwrite each other's changes. Reads do not take the lock. Separate processes
//! sharing one file are not coordinated.

use crate::config::CoreConfig;
use crate::error::{PatientError, PatientResult};
use crate::patch::PatientPatch;
use crate::patient::{PatientFields, PatientView};
use crate::sort::{sort_records, SortField, SortOrder};
use crate::store::{JsonFileStore, RecordStore};
use pmr_types::PatientId;
use std::sync::{Arc, Mutex, MutexGuard};

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn RecordStore>,
    write_lock: Arc<Mutex<()>>,
}

impl PatientService {
    /// Creates a service backed by the JSON file named in `cfg`.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self::with_store(Arc::new(JsonFileStore::new(cfg.patient_data_file())))
    }

    /// Creates a service over any record store.
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_writes(&self) -> PatientResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| PatientError::LockPoisoned)
    }

    /// Adds a new patient under `id`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - `id` is empty ([`PatientError::InvalidId`]),
    /// - any field fails validation ([`PatientError::Validation`]),
    /// - a patient with this exact id already exists ([`PatientError::AlreadyExists`]),
    /// - the record set cannot be loaded or saved.
    ///
    /// Nothing is written on any error.
    pub fn create(&self, id: &str, fields: PatientFields) -> PatientResult<PatientId> {
        let id = PatientId::new(id)?;
        let record = fields.validate()?;

        let _guard = self.lock_writes()?;
        let mut records = self.store.load()?;
        if records.contains_key(&id) {
            return Err(PatientError::AlreadyExists(id.to_string()));
        }

        records.insert(id.clone(), record);
        self.store.save(&records)?;

        tracing::info!("created patient {}", id);
        Ok(id)
    }

    /// Returns the patient with derived fields freshly computed.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record exists under the canonical id.
    pub fn view(&self, raw_id: &str) -> PatientResult<PatientView> {
        let id = PatientId::canonical(raw_id)?;
        let records = self.store.load()?;

        records
            .get(&id)
            .map(|record| record.view())
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Returns every patient in ascending id order.
    pub fn list(&self) -> PatientResult<Vec<(PatientId, PatientView)>> {
        let records = self.store.load()?;
        Ok(records
            .iter()
            .map(|(id, record)| (id.clone(), record.view()))
            .collect())
    }

    /// Returns every patient sorted by `field`. Ties keep ascending id order.
    pub fn sort(&self, field: SortField, order: SortOrder) -> PatientResult<Vec<PatientView>> {
        let records = self.store.load()?;
        Ok(sort_records(records.values(), field, order))
    }

    /// Applies `patch` to an existing patient and returns the updated view.
    ///
    /// Only fields present in the patch change. The merged record is validated as a
    /// whole before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - no record exists under the canonical id ([`PatientError::NotFound`]),
    /// - the merged record fails validation ([`PatientError::Validation`]),
    /// - the record set cannot be loaded or saved.
    pub fn update(&self, raw_id: &str, patch: PatientPatch) -> PatientResult<PatientView> {
        let id = PatientId::canonical(raw_id)?;
        if patch.is_empty() {
            tracing::debug!("update of patient {} carries no fields", id);
        }

        let _guard = self.lock_writes()?;
        let mut records = self.store.load()?;
        let current = records
            .get(&id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;

        let changed = patch.provided_fields();
        let updated = patch.apply_to(current)?;
        let view = updated.view();

        records.insert(id.clone(), updated);
        self.store.save(&records)?;

        tracing::info!("updated patient {} (fields: {:?})", id, changed);
        Ok(view)
    }

    /// Removes a patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record exists under the canonical id.
    pub fn delete(&self, raw_id: &str) -> PatientResult<()> {
        let id = PatientId::canonical(raw_id)?;

        let _guard = self.lock_writes()?;
        let mut records = self.store.load()?;
        if records.remove(&id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.store.save(&records)?;

        tracing::info!("deleted patient {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for PatientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientService").finish_non_exhaustive()
    }
}
