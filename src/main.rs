// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::catalog_service::CatalogService;
use crate::application::outcome_generator::OutcomeGenerator;
use crate::application::streaming_service::WaveformStreamingService;
use crate::application::test_session::TestSessionService;
use crate::infrastructure::catalog_store::JsonFileCatalog;
use crate::infrastructure::config::load_app_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_cable, cable_path, current_test, export_session, health_check, list_cable_types, list_cables,
    list_history, remove_cable, run_test, save_export, stream_waveform, waveform_frame,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let catalog_repository = Arc::new(JsonFileCatalog::new(config.catalog.path.clone()));

    // Create services (application layer)
    let generator = OutcomeGenerator::from_config(&config.simulation)?;
    let session = TestSessionService::new(generator);
    let streaming = WaveformStreamingService::new(&config.waveform)?;
    let catalog = CatalogService::new(catalog_repository);

    // Create application state
    let state = Arc::new(AppState {
        session,
        streaming,
        catalog,
        waveform: config.waveform.clone(),
        export: config.export.clone(),
    });

    // Build router (presentation layer)
    // Responses are Brotli-encoded by hand where supported, so no
    // CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/tests", post(run_test))
        .route("/tests/current", get(current_test))
        .route("/tests/current/waveform", get(waveform_frame))
        .route("/tests/current/waveform/stream", get(stream_waveform))
        .route("/tests/current/cable-path", get(cable_path))
        .route("/history", get(list_history))
        .route("/export", get(export_session).post(save_export))
        .route("/cables", get(list_cables).post(add_cable))
        .route("/cables/:name", delete(remove_cable))
        .route("/cable-types", get(list_cable_types))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting tdr-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
