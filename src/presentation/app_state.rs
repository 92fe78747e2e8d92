// Application state for HTTP handlers
use crate::application::catalog_service::CatalogService;
use crate::application::streaming_service::WaveformStreamingService;
use crate::application::test_session::TestSessionService;
use crate::infrastructure::config::{ExportSettings, WaveformConfig};

#[derive(Clone)]
pub struct AppState {
    pub session: TestSessionService,
    pub streaming: WaveformStreamingService,
    pub catalog: CatalogService,
    pub waveform: WaveformConfig,
    pub export: ExportSettings,
}
