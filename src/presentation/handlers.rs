// HTTP request handlers
use crate::application::test_session::TestReport;
use crate::domain::cable::{CableSpec, KNOWN_CABLE_TYPES};
use crate::domain::error::DomainError;
use crate::domain::history::HistoryRow;
use crate::domain::outcome::TestOutcome;
use crate::domain::waveform::{cable_path_frame, CablePathFrame, WaveformFrame};
use crate::infrastructure::chunked_frames::stream_from_receiver;
use crate::infrastructure::config::WaveformConfig;
use crate::infrastructure::export::{write_export, ExportDocument, ExportFormat};
use crate::infrastructure::http_response::{accepts_brotli, encoded_response, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestRequest {
    pub cable_type: String,
    pub length: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaveformQuery {
    pub phase: Option<u64>,
    pub samples: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CablePathQuery {
    pub tick: Option<u64>,
    pub segments: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub samples: Option<usize>,
    pub ticks: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavedExport {
    pub path: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Run a new simulated test; the previous one moves into history
pub async fn run_test(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewTestRequest>,
) -> Result<(StatusCode, Json<TestReport>), ApiError> {
    let outcome = state
        .session
        .run_test(&request.cable_type, request.length)
        .await?;
    Ok((StatusCode::CREATED, Json(TestReport::new(outcome))))
}

pub async fn current_test(State(state): State<Arc<AppState>>) -> Result<Json<TestReport>, ApiError> {
    let report = state.session.current_report().await.ok_or_else(no_current_test)?;
    Ok(Json(report))
}

/// One waveform frame for the given animation phase
pub async fn waveform_frame(
    Query(query): Query<WaveformQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<WaveformFrame>, ApiError> {
    let outcome = require_current(&state).await?;
    let samples = resolve_samples(query.samples, &state.waveform)?;
    let frame = state
        .streaming
        .sampler()
        .sample(&outcome, query.phase.unwrap_or(0), samples)?;
    Ok(Json(frame))
}

pub async fn cable_path(
    Query(query): Query<CablePathQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<CablePathFrame>, ApiError> {
    let outcome = require_current(&state).await?;
    let segments = resolve_segments(query.segments, &state.waveform)?;
    let frame = cable_path_frame(&outcome, query.tick.unwrap_or(0), segments)?;
    Ok(Json(frame))
}

/// Stream waveform frames (progressive animation) as length-prefixed chunks
pub async fn stream_waveform(
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let outcome = require_current(&state).await?;
    let samples = resolve_samples(query.samples, &state.waveform)?;
    let compress = accepts_brotli(&headers);

    tracing::debug!(
        "Streaming waveform for {}: {} samples, ticks {:?}",
        outcome.cable_type,
        samples,
        query.ticks
    );
    let rx = state.streaming.stream_waveform(outcome, samples, query.ticks)?;
    Ok(stream_from_receiver(rx, compress).await.into_response())
}

/// Archived tests, newest first
pub async fn list_history(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let rows: Vec<HistoryRow> = state.session.history_rows(Utc::now()).await;
    match json_response(&rows, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Cable types offered by the new-test form
pub async fn list_cable_types() -> Json<Vec<&'static str>> {
    Json(KNOWN_CABLE_TYPES.to_vec())
}

/// Export document for download
pub async fn export_session(
    Query(query): Query<ExportQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let format = resolve_format(query.format.as_deref())?;
    let snapshot = state.session.snapshot().await;
    let document = ExportDocument::from_snapshot(&snapshot, Utc::now());
    let body = document.render(format)?;

    match encoded_response(body.into_bytes(), format.content_type(), accepts_brotli(&headers)).await {
        Ok(response) => Ok(response),
        Err(status) => Ok(status.into_response()),
    }
}

/// Write the export document into the configured export directory
pub async fn save_export(
    Query(query): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SavedExport>, ApiError> {
    let format = resolve_format(query.format.as_deref())?;
    let snapshot = state.session.snapshot().await;
    let document = ExportDocument::from_snapshot(&snapshot, Utc::now());
    let path = write_export(&state.export, &document, format).await?;
    Ok(Json(SavedExport {
        path: path.display().to_string(),
    }))
}

pub async fn list_cables(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CableSpec>>, ApiError> {
    Ok(Json(state.catalog.list_cables().await?))
}

pub async fn add_cable(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<CableSpec>,
) -> Result<(StatusCode, Json<CableSpec>), ApiError> {
    let added = state.catalog.add_cable(spec).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn remove_cable(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    if state.catalog.remove_cable(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("cable '{name}' not in catalog")))
    }
}

fn no_current_test() -> ApiError {
    ApiError::NotFound("no test has been run yet".to_string())
}

async fn require_current(state: &AppState) -> Result<TestOutcome, ApiError> {
    state.session.current().await.ok_or_else(no_current_test)
}

fn resolve_samples(requested: Option<usize>, config: &WaveformConfig) -> Result<usize, ApiError> {
    let samples = requested.unwrap_or(config.sample_count);
    if samples > config.max_sample_count {
        return Err(DomainError::invalid(format!(
            "sample count {} above limit {}",
            samples, config.max_sample_count
        ))
        .into());
    }
    Ok(samples)
}

fn resolve_segments(requested: Option<usize>, config: &WaveformConfig) -> Result<usize, ApiError> {
    let segments = requested.unwrap_or(config.segment_count);
    if segments > config.max_segment_count {
        return Err(DomainError::invalid(format!(
            "segment count {} above limit {}",
            segments, config.max_segment_count
        ))
        .into());
    }
    Ok(segments)
}

fn resolve_format(requested: Option<&str>) -> Result<ExportFormat, ApiError> {
    match requested {
        None => Ok(ExportFormat::default()),
        Some(value) => ExportFormat::parse(value)
            .ok_or_else(|| DomainError::invalid(format!("unknown export format '{value}'")).into()),
    }
}
