use crate::domain::waveform::{DEFAULT_PHASE_PERIOD, DEFAULT_SEGMENT_COUNT};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub simulation: SimulationConfig,
    pub waveform: WaveformConfig,
    pub catalog: CatalogSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Presentation-tuned constants for the outcome generator
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub fault_probability: f64,
    pub max_fault_fraction: f64,
    /// Half-open [low, high) quality band for faulted cables
    pub faulted_quality: (u8, u8),
    /// Half-open [low, high) quality band for clean cables
    pub clean_quality: (u8, u8),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fault_probability: 0.6,
            max_fault_fraction: 0.8,
            faulted_quality: (60, 80),
            clean_quality: (85, 100),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WaveformConfig {
    pub period: u64,
    pub sample_count: usize,
    pub max_sample_count: usize,
    pub segment_count: usize,
    pub max_segment_count: usize,
    pub tick_interval_ms: u64,
    /// Streamed phase counter wraps here
    pub phase_wrap: u64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PHASE_PERIOD,
            sample_count: 600,
            max_sample_count: 4096,
            segment_count: DEFAULT_SEGMENT_COUNT,
            max_segment_count: 1000,
            tick_interval_ms: 50,
            phase_wrap: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogSettings {
    pub path: PathBuf,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/cable_library.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
            file_name: "cablescope-export-${date}.${ext}".to_string(),
        }
    }
}

/// Reads `config/tdr.*` when present, then `TDR__SECTION__KEY` environment
/// overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tdr").required(false))
        .add_source(config::Environment::with_prefix("TDR").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a template string
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("date".to_string(), "2026-01-18".to_string());
        vars.insert("ext".to_string(), "json".to_string());

        let result = render_template(&ExportSettings::default().file_name, &vars);

        assert_eq!(result, "cablescope-export-2026-01-18.json");
    }

    #[test]
    fn test_defaults_match_simulation_constants() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.fault_probability, 0.6);
        assert_eq!(config.simulation.max_fault_fraction, 0.8);
        assert_eq!(config.simulation.faulted_quality, (60, 80));
        assert_eq!(config.simulation.clean_quality, (85, 100));
        assert_eq!(config.waveform.period, 100);
        assert_eq!(config.waveform.max_segment_count, 1000);
        assert_eq!(config.server.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[simulation]\nfault_probability = 0.25\n\n[waveform]\ntick_interval_ms = 20\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.simulation.fault_probability, 0.25);
        assert_eq!(config.simulation.clean_quality, (85, 100));
        assert_eq!(config.waveform.tick_interval_ms, 20);
        assert_eq!(config.waveform.sample_count, 600);
        assert_eq!(config.catalog.path, PathBuf::from("data/cable_library.json"));
    }
}
