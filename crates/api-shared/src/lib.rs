//! # API Shared
//!
//! Shared request and response types for the patient metrics registry APIs.
//!
//! Contains:
//! - Wire DTOs with OpenAPI schemas (`utoipa`)
//! - Shared services like `HealthService`
//!
//! These types carry no validation of their own; `pmr-core` validates after conversion.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub mod health;

pub use health::HealthService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Full patient payload for `POST /create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    /// ID of the patient
    #[schema(example = "P001")]
    pub id: String,
    /// Name of the patient
    #[schema(example = "Asha")]
    pub name: String,
    /// City where the patient is living
    #[schema(example = "Pune")]
    pub city: String,
    /// Age of the patient, greater than 0 and less than 120
    #[schema(example = 30)]
    pub age: i64,
    /// Either `male` or `female`
    #[schema(example = "female")]
    pub gender: String,
    /// Height of the patient in metres, greater than 0
    #[schema(example = 1.6)]
    pub height: f64,
    /// Weight of the patient in kilograms, greater than 0
    #[schema(example = 50.0)]
    pub weight: f64,
}

/// Partial patient payload for `PUT /update/{p_id}`. Absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdatePatientReq {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

/// A stored patient with derived `bmi` and `verdict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub name: String,
    pub city: String,
    pub age: u8,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    #[schema(example = 19.53)]
    pub bmi: f64,
    #[schema(example = "Normal")]
    pub verdict: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorRes>,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
        }
    }
}

/// Query string for `GET /sort`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// Sort on the basis of height, weight, or bmi
    pub sort_by: String,
    /// asc or desc (default asc)
    pub order: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_res_omits_empty_field_errors() {
        let json = serde_json::to_value(ErrorRes::new("Patient not found")).unwrap();
        assert_eq!(json, serde_json::json!({ "detail": "Patient not found" }));
    }

    #[test]
    fn test_update_req_defaults_missing_fields() {
        let req: UpdatePatientReq = serde_json::from_str(r#"{"weight": 70}"#).unwrap();
        assert_eq!(req.weight, Some(70.0));
        assert_eq!(req.name, None);
    }

    #[test]
    fn test_health_check_is_ok() {
        assert!(HealthService::check_health().ok);
    }
}
