use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid patient fields: {0}")]
    Validation(ValidationErrors),
    #[error("invalid patient id: {0}")]
    InvalidId(#[from] pmr_types::TextError),

    #[error("patient already exists: {0}")]
    AlreadyExists(String),
    #[error("patient not found: {0}")]
    NotFound(String),

    #[error("invalid sort field '{given}', only {accepted:?} accepted")]
    InvalidSortField {
        given: String,
        accepted: &'static [&'static str],
    },
    #[error("invalid sort order '{given}', only {accepted:?} accepted")]
    InvalidSortOrder {
        given: String,
        accepted: &'static [&'static str],
    },

    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patients: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patients: {0}")]
    Deserialization(serde_json::Error),
    #[error("patient store lock poisoned")]
    LockPoisoned,
}

impl From<ValidationErrors> for PatientError {
    fn from(errors: ValidationErrors) -> Self {
        PatientError::Validation(errors)
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
