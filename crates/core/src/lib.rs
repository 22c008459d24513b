//! # PMR Core
//!
//! Core business logic for the patient metrics registry.
//!
//! This crate contains pure data operations:
//! - The patient record model, with BMI and verdict derived on read
//! - Partial updates merged field-by-field and re-validated as a whole
//! - Sorting by height, weight or BMI
//! - Whole-set persistence behind the [`RecordStore`] trait (JSON file or in-memory)
//!
//! **No API concerns**: HTTP servers, routing and response shapes belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patch;
pub mod patient;
pub mod repositories;
pub mod sort;
pub mod store;
pub mod validation;

pub use config::CoreConfig;
pub use constants::{DEFAULT_PATIENT_DATA_FILE, PATIENT_DATA_FILE_ENV};
pub use error::{PatientError, PatientResult};
pub use patch::PatientPatch;
pub use patient::{Age, Gender, PatientFields, PatientRecord, PatientView, Verdict};
pub use pmr_types::{NonEmptyText, PatientId, TextError};
pub use repositories::patients::PatientService;
pub use sort::{SortField, SortOrder};
pub use store::{InMemoryStore, JsonFileStore, RecordSet, RecordStore};
pub use validation::{FieldError, ValidationErrors};
