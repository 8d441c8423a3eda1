//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cabinet_core::export::{REPORT_FILE_NAME, REPORT_MIME};
use cabinet_core::{ChatTurn, Clinic, ClinicResult, PatientFields, ProfilePatch};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

fn rejected(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Run a clinic call on the blocking pool; the document store does file I/O
/// under the clinic mutex.
async fn blocking<T, F>(state: &AppState, call: F) -> ApiResult<T>
where
    F: FnOnce(&Clinic) -> ClinicResult<T> + Send + 'static,
    T: Send + 'static,
{
    let clinic = Arc::clone(&state.clinic);
    tokio::task::spawn_blocking(move || call(&clinic))
        .await
        .map_err(|e| ApiError::Internal(format!("Clinic task failed: {}", e)))?
        .map_err(ApiError::from)
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let backend = blocking(&state, |clinic| clinic.backend()).await?;
    Ok(Json(json!({ "status": "ok", "backend": backend.as_str() })))
}

// --- Cabinet ---

pub async fn cabinet_info(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let info = blocking(&state, |clinic| clinic.cabinet_info()).await?;
    Ok(Json(json!({ "success": true, "info": info })))
}

pub async fn update_cabinet(
    State(state): State<AppState>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(patch) = payload.map_err(rejected)?;
    blocking(&state, move |clinic| clinic.update_cabinet(patch)).await?;
    Ok(Json(json!({ "success": true })))
}

// --- Patients ---

pub async fn get_patients(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let patients = blocking(&state, |clinic| clinic.list_patients()).await?;
    let server_time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    Ok(Json(json!({
        "success": true,
        "patients": patients,
        "server_time": server_time,
    })))
}

pub async fn add_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(fields) = payload.map_err(rejected)?;
    let patient = blocking(&state, move |clinic| clinic.add_patient(fields))
        .await
        .map_err(ApiError::as_bad_request)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "patient": patient })),
    ))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientFields>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(fields) = payload.map_err(|r| ApiError::Internal(r.body_text()))?;
    let patient = blocking(&state, move |clinic| clinic.update_patient(&id, fields)).await?;
    Ok(Json(json!({ "success": true, "patient": patient })))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    blocking(&state, move |clinic| clinic.delete_patient(&id)).await?;
    Ok(Json(json!({ "success": true, "message": "Supprimé" })))
}

// --- Dashboard ---

pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let report = blocking(&state, |clinic| clinic.dashboard_stats()).await?;
    let mut body = json!({ "success": true, "stats": report.stats });
    if let Some(graph_data) = report.graph_data {
        body["graphData"] = json!(graph_data);
    }
    Ok(Json(body))
}

// --- Chat & export ---

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|r| rejected(r).bare())?;
    let response = blocking(&state, move |clinic| clinic.chat(&request.message))
        .await
        .map_err(ApiError::bare)?;
    Ok(Json(json!({ "response": response })))
}

pub async fn export_chat_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload.map_err(|r| rejected(r).bare())?;
    let bytes = blocking(&state, move |clinic| clinic.export_chat_report(&request.messages))
        .await
        .map_err(ApiError::bare)?;

    let headers = [
        (header::CONTENT_TYPE, REPORT_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
        ),
    ];
    Ok((headers, bytes).into_response())
}
