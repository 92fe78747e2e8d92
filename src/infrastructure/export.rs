// Session export - Field-labeled snapshot of the current test and history
use crate::application::test_session::SessionSnapshot;
use crate::domain::history::HistoryRow;
use crate::domain::metrics::{derive_metrics, DerivedMetrics};
use crate::domain::outcome::{format_meters, TestOutcome};
use crate::infrastructure::config::{render_template, ExportSettings};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to encode export as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode export as TOML: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Toml,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Toml => "application/toml",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTestData {
    pub cable_type: String,
    pub length: String,
    pub fault_distance: Option<String>,
    pub test_status: &'static str,
    pub impedance: String,
    pub expected_impedance: String,
    pub quality: u8,
    pub metrics: DerivedMetrics,
}

impl ExportTestData {
    fn from_outcome(outcome: &TestOutcome) -> Self {
        Self {
            cable_type: outcome.cable_type.clone(),
            length: format!("{}m", outcome.length),
            fault_distance: outcome.fault_distance.map(format_meters),
            test_status: outcome.status.label(),
            impedance: outcome.impedance.clone(),
            expected_impedance: outcome.expected_impedance.clone(),
            quality: outcome.quality,
            metrics: derive_metrics(outcome),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub timestamp: DateTime<Utc>,
    pub test_data: Option<ExportTestData>,
    pub test_history: Vec<HistoryRow>,
}

impl ExportDocument {
    pub fn from_snapshot(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            test_data: snapshot.current.as_ref().map(ExportTestData::from_outcome),
            test_history: snapshot.history.iter().map(|e| e.to_row(now)).collect(),
        }
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Toml => {
                // TOML has no null; absent values are dropped instead
                let mut value = serde_json::to_value(self)?;
                strip_nulls(&mut value);
                Ok(toml::to_string_pretty(&value)?)
            }
        }
    }
}

fn strip_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

pub fn export_file_name(settings: &ExportSettings, format: ExportFormat, now: DateTime<Utc>) -> String {
    let mut vars = HashMap::new();
    vars.insert("date".to_string(), now.format("%Y-%m-%d").to_string());
    vars.insert("ext".to_string(), format.extension().to_string());
    render_template(&settings.file_name, &vars)
}

/// Writes the rendered document into the export directory, returning its path
pub async fn write_export(
    settings: &ExportSettings,
    document: &ExportDocument,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let body = document.render(format)?;
    tokio::fs::create_dir_all(&settings.directory).await?;
    let path = settings
        .directory
        .join(export_file_name(settings, format, document.timestamp));
    tokio::fs::write(&path, body).await?;
    tracing::info!("Exported session to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::TestHistory;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 18, 17, 56, 0).unwrap()
    }

    fn snapshot() -> SessionSnapshot {
        let mut history = TestHistory::default();
        history.archive(TestOutcome::new("Fiber SM", 500.0, None, 98).unwrap(), now());
        SessionSnapshot {
            current: Some(TestOutcome::new("Cat6 UTP", 100.0, Some(47.3), 73).unwrap()),
            history: history.entries().to_vec(),
        }
    }

    #[test]
    fn test_json_document_labels() {
        let document = ExportDocument::from_snapshot(&snapshot(), now());
        let json: serde_json::Value =
            serde_json::from_str(&document.render(ExportFormat::Json).unwrap()).unwrap();

        assert_eq!(json["testData"]["cableType"], "Cat6 UTP");
        assert_eq!(json["testData"]["faultDistance"], "47.3m");
        assert_eq!(json["testData"]["testStatus"], "Failed");
        assert_eq!(json["testData"]["impedance"], "∞ Ω");
        assert_eq!(json["testData"]["metrics"]["signalIntegrity"]["value"], 63.0);
        assert_eq!(json["testHistory"][0]["result"], "pass");
        assert_eq!(json["testHistory"][0]["time"], "Just now");
        assert!(json["testHistory"][0]["faultAt"].is_null());
    }

    #[test]
    fn test_toml_document_drops_nulls() {
        let document = ExportDocument::from_snapshot(&snapshot(), now());
        let rendered = document.render(ExportFormat::Toml).unwrap();
        let parsed: toml::Value = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed["testData"]["expectedImpedance"].as_str(), Some("100Ω"));
        let row = &parsed["testHistory"].as_array().unwrap()[0];
        assert_eq!(row["cableType"].as_str(), Some("Fiber SM"));
        assert!(row.get("faultAt").is_none());
    }

    #[test]
    fn test_empty_session_exports() {
        let empty = SessionSnapshot {
            current: None,
            history: Vec::new(),
        };
        let document = ExportDocument::from_snapshot(&empty, now());
        assert!(document.render(ExportFormat::Toml).is_ok());
        let json: serde_json::Value =
            serde_json::from_str(&document.render(ExportFormat::Json).unwrap()).unwrap();
        assert!(json["testData"].is_null());
    }

    #[test]
    fn test_file_name_and_format_parsing() {
        let settings = ExportSettings::default();
        assert_eq!(
            export_file_name(&settings, ExportFormat::Json, now()),
            "cablescope-export-2026-01-18.json"
        );
        assert_eq!(ExportFormat::parse("TOML"), Some(ExportFormat::Toml));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }

    #[tokio::test]
    async fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            directory: dir.path().join("out"),
            ..ExportSettings::default()
        };
        let document = ExportDocument::from_snapshot(&snapshot(), now());

        let path = write_export(&settings, &document, ExportFormat::Json).await.unwrap();
        assert!(path.ends_with("cablescope-export-2026-01-18.json"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\"testHistory\""));
    }
}
