//! # API REST
//!
//! REST API implementation for the patient metrics registry.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Record logic lives in `pmr-core`; request and response shapes live in `api-shared`.

#![warn(rust_2018_idioms)]

mod error;

pub use error::ApiError;

use api_shared::{
    CreatePatientReq, ErrorRes, FieldErrorRes, HealthRes, HealthService, MessageRes, PatientRes,
    SortQuery, UpdatePatientReq,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use pmr_core::{PatientFields, PatientPatch, PatientService, PatientView, SortField, SortOrder};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone, Debug)]
struct AppState {
    patient_service: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        welcome,
        health,
        create_patient,
        view_patient,
        sort_by_path,
        sort_by_query,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        HealthRes,
        CreatePatientReq,
        UpdatePatientReq,
        PatientRes,
        MessageRes,
        ErrorRes,
        FieldErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over `patient_service`.
///
/// Includes Swagger UI at `/swagger-ui` and the OpenAPI document at `/api-docs/openapi.json`.
pub fn router(patient_service: PatientService) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/create", post(create_patient))
        .route("/patient/:p_id", get(view_patient))
        .route("/sort/:sort_by/:order", get(sort_by_path))
        .route("/sort", get(sort_by_query))
        .route("/update/:p_id", put(update_patient))
        .route("/delete/:p_id", delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { patient_service })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = String)
    )
)]
async fn welcome() -> &'static str {
    "Welcome to our website"
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = MessageRes),
        (status = 400, description = "Duplicate id or invalid patient data", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// The id is stored exactly as given. All other fields are validated before anything is
/// written.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - a patient with this id already exists,
/// - any field fails validation (each failing field is listed in `errors`).
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let Json(req) = payload?;
    let fields = PatientFields {
        name: req.name,
        city: req.city,
        age: req.age,
        gender: req.gender,
        height: req.height,
        weight: req.weight,
    };

    state
        .patient_service
        .create(&req.id, fields)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageRes {
            message: "Patient added successfully".into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patient/{p_id}",
    params(
        ("p_id" = String, Path, description = "Id of patient", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient with derived bmi and verdict", body = PatientRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// View one patient
///
/// The id is canonicalised (first character upper-cased, rest lower-cased) before lookup.
#[axum::debug_handler]
async fn view_patient(
    State(state): State<AppState>,
    Path(p_id): Path<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let view = state
        .patient_service
        .view(&p_id)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::NOT_FOUND))?;
    Ok(Json(patient_res(view)))
}

#[utoipa::path(
    get,
    path = "/sort/{sort_by}/{order}",
    params(
        ("sort_by" = String, Path, description = "Sort on the basis of height, weight, or bmi", example = "height"),
        ("order" = String, Path, description = "Order of sorting asc or desc", example = "asc")
    ),
    responses(
        (status = 200, description = "All patients, sorted", body = [PatientRes]),
        (status = 400, description = "Invalid field or order", body = ErrorRes)
    )
)]
/// Sort all patients using path parameters
///
/// Both parameters must match exactly; no case folding is applied.
#[axum::debug_handler]
async fn sort_by_path(
    State(state): State<AppState>,
    Path((sort_by, order)): Path<(String, String)>,
) -> Result<Json<Vec<PatientRes>>, ApiError> {
    sorted(&state, &sort_by, &order)
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortQuery),
    responses(
        (status = 200, description = "All patients, sorted", body = [PatientRes]),
        (status = 400, description = "Invalid field or order", body = ErrorRes)
    )
)]
/// Sort all patients using query parameters
///
/// `sort_by` is required; `order` defaults to `asc`. Both are lower-cased before matching.
#[axum::debug_handler]
async fn sort_by_query(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<Vec<PatientRes>>, ApiError> {
    let Query(query) = query?;
    let sort_by = query.sort_by.to_lowercase();
    let order = query
        .order
        .map(|o| o.to_lowercase())
        .unwrap_or_else(|| SortOrder::default().as_str().to_string());

    sorted(&state, &sort_by, &order)
}

fn sorted(state: &AppState, sort_by: &str, order: &str) -> Result<Json<Vec<PatientRes>>, ApiError> {
    let field = SortField::parse(sort_by)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;
    let order = SortOrder::parse(order)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;

    let views = state
        .patient_service
        .sort(field, order)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(views.into_iter().map(patient_res).collect()))
}

#[utoipa::path(
    put,
    path = "/update/{p_id}",
    request_body = UpdatePatientReq,
    params(
        ("p_id" = String, Path, description = "Id of patient", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 400, description = "Patient not found or invalid merged data", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Partially update a patient
///
/// Fields that are absent or `null` keep their stored values. The merged record is
/// validated as a whole, so a patch can be rejected because of the data it combines with.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the patient does not exist,
/// - the merged record fails validation.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(p_id): Path<String>,
    payload: Result<Json<UpdatePatientReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Json(req) = payload?;
    let patch = PatientPatch {
        name: req.name,
        city: req.city,
        age: req.age,
        gender: req.gender,
        height: req.height,
        weight: req.weight,
    };

    state
        .patient_service
        .update(&p_id, patch)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(MessageRes {
        message: "Patient updated successfully".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/delete/{p_id}",
    params(
        ("p_id" = String, Path, description = "Enter id of patient to be deleted", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 400, description = "Patient not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Path(p_id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state
        .patient_service
        .delete(&p_id)
        .map_err(|e| ApiError::from_patient_error(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(MessageRes {
        message: "Patient deleted successfully".into(),
    }))
}

fn patient_res(view: PatientView) -> PatientRes {
    PatientRes {
        name: view.record.name().to_string(),
        city: view.record.city().to_string(),
        age: view.record.age().years(),
        gender: view.record.gender().to_string(),
        height: view.record.height(),
        weight: view.record.weight(),
        bmi: view.bmi,
        verdict: view.verdict.to_string(),
    }
}
