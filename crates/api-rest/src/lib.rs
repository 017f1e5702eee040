//! # API REST
//!
//! REST API for the patient registry.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! All data operations go through [`registry_core::RegistryService`]. Core calls do blocking
//! file I/O, so handlers run them on the blocking pool.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use registry_core::{PatientFields, RegistryError, RegistryService, Sex};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::{
    CreatePatientReq, CreatePatientRes, DetailRowRes, HealthRes, LabelsRes, ListPatientsRes,
    PatientDetailRes, PatientRes, PatientTableRes,
};

type ApiError = (StatusCode, String);

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub service: RegistryService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        get_patient,
        patient_table,
        patient_labels,
        find_by_label,
        edit_patient,
        delete_patient,
    ),
    components(schemas(
        HealthRes,
        PatientRes,
        ListPatientsRes,
        CreatePatientReq,
        CreatePatientRes,
        PatientTableRes,
        LabelsRes,
        PatientDetailRes,
        DetailRowRes,
    ))
)]
pub struct ApiDoc;

/// Builds the router with every registry route, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/table", get(patient_table))
        .route("/patients/labels", get(patient_labels))
        .route("/patients/by-label", get(find_by_label))
        .route(
            "/patients/:cpf",
            get(get_patient).put(edit_patient).delete(delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the registry API until the process stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, service: RegistryService) -> anyhow::Result<()> {
    tracing::info!(
        "-- Starting registry REST API on {} (data file {})",
        addr,
        service.config().data_file().display()
    );

    let app = router(AppState { service });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs a blocking core call off the async runtime and maps its error to a response.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, RegistryError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(error_response),
        Err(e) => {
            tracing::error!("blocking task failed: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into()))
        }
    }
}

fn error_response(err: RegistryError) -> ApiError {
    match err {
        RegistryError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        RegistryError::Duplicate { .. } => (StatusCode::CONFLICT, err.to_string()),
        RegistryError::Storage(e) => {
            tracing::error!("Storage error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

fn parse_birth_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("invalid birth_date '{value}' (expected DD/MM/YYYY or YYYY-MM-DD)"),
            )
        })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Registry REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients in storage order", body = ListPatientsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all patients
///
/// An empty `patients` array means nobody is registered yet.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Result<Json<ListPatientsRes>, ApiError> {
    let records = run_blocking(move || state.service.directory().list()).await?;
    Ok(Json(ListPatientsRes {
        total: records.len(),
        patients: records.into_iter().map(PatientRes::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient registered", body = CreatePatientRes),
        (status = 400, description = "Missing required field or unparseable value"),
        (status = 409, description = "National ID already registered"),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a new patient
///
/// # Errors
/// Returns `400 Bad Request` for missing required fields, an unknown sex or an unparseable
/// birth date, and `409 Conflict` when the national ID is already registered.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<CreatePatientRes>), ApiError> {
    let birth_date = parse_birth_date(&req.birth_date)?;
    let sex: Sex = req
        .sex
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;

    let fields = PatientFields {
        full_name: req.full_name,
        national_id: req.national_id,
        phone: req.phone,
        email: req.email.unwrap_or_default(),
        birth_date,
        sex,
        address: req.address.unwrap_or_default(),
        notes: req.notes.unwrap_or_default(),
    };

    let record = run_blocking(move || state.service.registration().register(fields)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            patient: PatientRes::from(record),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{cpf}",
    params(("cpf" = String, Path, description = "National ID (CPF)")),
    responses(
        (status = 200, description = "Patient found", body = PatientDetailRes),
        (status = 404, description = "No patient with this national ID"),
        (status = 500, description = "Internal server error")
    )
)]
/// Look up one patient by national ID
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let found = run_blocking(move || state.service.directory().get(&cpf)).await?;
    found
        .map(|record| Json(PatientDetailRes::from(record)))
        .ok_or((StatusCode::NOT_FOUND, "Patient not found".into()))
}

#[utoipa::path(
    get,
    path = "/patients/table",
    responses(
        (status = 200, description = "Display table of all patients", body = PatientTableRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Display table of all patients, columns in presentation order
#[axum::debug_handler]
async fn patient_table(State(state): State<AppState>) -> Result<Json<PatientTableRes>, ApiError> {
    let table = run_blocking(move || state.service.directory().table()).await?;
    Ok(Json(PatientTableRes {
        columns: table.columns.iter().map(|c| c.to_string()).collect(),
        rows: table.rows,
    }))
}

#[utoipa::path(
    get,
    path = "/patients/labels",
    responses(
        (status = 200, description = "Selection labels in storage order", body = LabelsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Selection labels, `"<name> - <cpf>"`
#[axum::debug_handler]
async fn patient_labels(State(state): State<AppState>) -> Result<Json<LabelsRes>, ApiError> {
    let labels = run_blocking(move || state.service.directory().labels()).await?;
    Ok(Json(LabelsRes { labels }))
}

#[derive(Debug, Deserialize)]
struct LabelQuery {
    label: String,
}

#[utoipa::path(
    get,
    path = "/patients/by-label",
    params(("label" = String, Query, description = "Selection label, \"<name> - <cpf>\"")),
    responses(
        (status = 200, description = "Patient found", body = PatientDetailRes),
        (status = 404, description = "Label does not match any patient"),
        (status = 500, description = "Internal server error")
    )
)]
/// Resolve a selection label back to its patient
#[axum::debug_handler]
async fn find_by_label(
    State(state): State<AppState>,
    Query(query): Query<LabelQuery>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let found =
        run_blocking(move || state.service.directory().find_by_label(&query.label)).await?;
    found
        .map(|record| Json(PatientDetailRes::from(record)))
        .ok_or((StatusCode::NOT_FOUND, "Patient not found".into()))
}

#[utoipa::path(
    put,
    path = "/patients/{cpf}",
    params(("cpf" = String, Path, description = "National ID (CPF)")),
    responses(
        (status = 501, description = "Editing patients is not implemented")
    )
)]
/// Edit a patient (not implemented)
async fn edit_patient(Path(cpf): Path<String>) -> ApiError {
    tracing::warn!("edit requested for {} but editing is not implemented", cpf);
    (
        StatusCode::NOT_IMPLEMENTED,
        "Editing patients is not implemented".into(),
    )
}

#[utoipa::path(
    delete,
    path = "/patients/{cpf}",
    params(("cpf" = String, Path, description = "National ID (CPF)")),
    responses(
        (status = 501, description = "Deleting patients is not implemented")
    )
)]
/// Delete a patient (not implemented)
async fn delete_patient(Path(cpf): Path<String>) -> ApiError {
    tracing::warn!("delete requested for {} but deleting is not implemented", cpf);
    (
        StatusCode::NOT_IMPLEMENTED,
        "Deleting patients is not implemented".into(),
    )
}
