//! Mapping of core errors onto HTTP responses.

use api_shared::{ErrorRes, FieldErrorRes};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pmr_core::PatientError;

/// An error response: status code plus an [`ErrorRes`] body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorRes,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorRes) -> Self {
        Self { status, body }
    }

    /// Maps a core error, using `not_found` as the status for missing patients.
    ///
    /// Viewing a missing patient is a 404; updating or deleting one is a 400.
    pub fn from_patient_error(err: PatientError, not_found: StatusCode) -> Self {
        match err {
            PatientError::Validation(errors) => {
                tracing::warn!(
                    "rejected patient data, failing fields: {:?}",
                    errors.fields().collect::<Vec<_>>()
                );
                let body = ErrorRes {
                    detail: "Invalid patient data".into(),
                    errors: errors
                        .iter()
                        .map(|e| FieldErrorRes {
                            field: e.field.to_string(),
                            message: e.message.clone(),
                        })
                        .collect(),
                };
                Self::new(StatusCode::BAD_REQUEST, body)
            }
            PatientError::InvalidId(e) => {
                tracing::warn!("rejected patient id: {}", e);
                Self::new(StatusCode::BAD_REQUEST, ErrorRes::new("Invalid patient id"))
            }
            PatientError::AlreadyExists(id) => {
                tracing::warn!("patient {} already exists", id);
                Self::new(
                    StatusCode::BAD_REQUEST,
                    ErrorRes::new("Patient already exists"),
                )
            }
            PatientError::NotFound(id) => {
                tracing::warn!("patient {} not found", id);
                Self::new(not_found, ErrorRes::new("Patient not found"))
            }
            PatientError::InvalidSortField { accepted, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorRes::new(format!("Invalid field, only {:?} accepted", accepted)),
            ),
            PatientError::InvalidSortOrder { accepted, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorRes::new(format!("Invalid order, only {:?} are the options", accepted)),
            ),
            other => {
                tracing::error!("patient store error: {:?}", other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes::new("Internal error"),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {}", rejection);
        Self::new(rejection.status(), ErrorRes::new(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("rejected query string: {}", rejection);
        Self::new(rejection.status(), ErrorRes::new(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
