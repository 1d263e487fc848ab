// HTTP request handlers
use crate::application::confirmation::{Prompt, Resolution};
use crate::application::record_manager::{FieldInput, Operation, RecordManager};
use crate::domain::dashboard::Dashboard;
use crate::domain::dock::DeviceSwitch;
use crate::domain::record::{ModuleSchema, RecordId};
use crate::domain::telemetry::{HistoryReport, TelemetrySample};
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::MutexGuard;

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Form value as sent by the browser: numeric inputs may arrive as JSON numbers
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    Number(f64),
}

#[derive(Deserialize)]
pub struct FieldsBody {
    pub fields: BTreeMap<String, InputValue>,
}

impl FieldsBody {
    fn into_input(self) -> FieldInput {
        self.fields
            .into_iter()
            .map(|(name, value)| {
                let raw = match value {
                    InputValue::Text(text) => text,
                    InputValue::Number(n) => n.to_string(),
                };
                (name, raw)
            })
            .collect()
    }
}

async fn module<'a>(state: &'a AppState, slug: &str) -> Result<MutexGuard<'a, RecordManager>, ApiError> {
    let manager = state
        .catalog
        .get(slug)
        .ok_or_else(|| ApiError::UnknownModule(slug.to_string()))?;
    Ok(manager.lock().await)
}

async fn stage(state: &AppState, slug: &str, op: Operation) -> Result<Json<Prompt>, ApiError> {
    let mut manager = module(state, slug).await?;
    Ok(Json(manager.stage(op)?))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    Json(state.dashboard_service.get_dashboard().await)
}

pub async fn list_modules(State(state): State<Arc<AppState>>) -> Json<Vec<ModuleSchema>> {
    Json(state.catalog.schemas().await)
}

/// Filtered, paginated view of a module. Each request carries its own
/// `search` and `page` (default: everything, page 1); nothing is remembered
/// between requests.
pub async fn list_records(
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let view = module(&state, &slug)
        .await?
        .view_for(query.search.as_deref().unwrap_or(""), query.page.unwrap_or(1));

    match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => Ok(response),
        Err(status) => Ok(status.into_response()),
    }
}

pub async fn stage_add(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<FieldsBody>, JsonRejection>,
) -> Result<Json<Prompt>, ApiError> {
    let Json(body) = body?;
    stage(&state, &slug, Operation::Add(body.into_input())).await
}

pub async fn stage_edit(
    Path((slug, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<FieldsBody>, JsonRejection>,
) -> Result<Json<Prompt>, ApiError> {
    let Json(body) = body?;
    stage(&state, &slug, Operation::Edit(RecordId(id), body.into_input())).await
}

pub async fn stage_status(
    Path((slug, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Prompt>, ApiError> {
    stage(&state, &slug, Operation::AdvanceStatus(RecordId(id))).await
}

pub async fn stage_remove(
    Path((slug, id)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Prompt>, ApiError> {
    stage(&state, &slug, Operation::Remove(RecordId(id))).await
}

/// Applies the staged change named by the prompt's ticket
pub async fn confirm_pending(
    Path((slug, ticket)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Resolution>, ApiError> {
    let mut manager = module(&state, &slug).await?;
    Ok(Json(Resolution::from_ack(manager.confirm_ticket(ticket)?)))
}

pub async fn decline_pending(
    Path((slug, ticket)): Path<(String, u64)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Resolution>, ApiError> {
    let mut manager = module(&state, &slug).await?;
    manager.decline_ticket(ticket)?;
    Ok(Json(Resolution::Declined))
}

pub async fn realtime_latest(State(state): State<Arc<AppState>>) -> Json<Option<Arc<TelemetrySample>>> {
    Json(state.realtime.latest().await)
}

/// Stream live samples as chunked JSON lines
pub async fn realtime_stream(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.realtime.stream_samples().await {
        Some(rx) => stream_from_receiver(rx, accepts_brotli(&headers)).await.into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

pub async fn dock_history(
    Path(dock): Path<u32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryReport>, ApiError> {
    Ok(Json(state.history_service.report(dock)?))
}

pub async fn dock_devices(
    Path(dock): Path<u32>,
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeviceSwitch>>, ApiError> {
    let control = state.remote_control.lock().await;
    Ok(Json(control.search(dock, query.search.as_deref().unwrap_or(""))?))
}

pub async fn stage_device_toggle(
    Path((dock, device)): Path<(u32, u32)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Prompt>, ApiError> {
    let mut control = state.remote_control.lock().await;
    Ok(Json(control.request_toggle(dock, device)?))
}

pub async fn confirm_device_toggle(
    Path(ticket): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Resolution>, ApiError> {
    let mut control = state.remote_control.lock().await;
    let acknowledgement = control.confirm_ticket(ticket)?;
    Ok(Json(Resolution::Applied { acknowledgement }))
}

pub async fn decline_device_toggle(
    Path(ticket): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Resolution>, ApiError> {
    let mut control = state.remote_control.lock().await;
    control.decline_ticket(ticket)?;
    Ok(Json(Resolution::Declined))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
