// Test session service - Owns the current outcome and the archived history
use crate::application::outcome_generator::OutcomeGenerator;
use crate::domain::cable::CableFamily;
use crate::domain::error::DomainResult;
use crate::domain::history::{HistoryRow, TestHistory, TestHistoryEntry};
use crate::domain::metrics::{derive_metrics, DerivedMetrics};
use crate::domain::outcome::TestOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome plus everything the summary cards derive from it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub outcome: TestOutcome,
    pub metrics: DerivedMetrics,
    pub cable_family: &'static str,
    pub status_label: &'static str,
    pub status_summary: &'static str,
    pub impedance_abnormal: bool,
}

impl TestReport {
    pub fn new(outcome: TestOutcome) -> Self {
        Self {
            metrics: derive_metrics(&outcome),
            cable_family: CableFamily::of(&outcome.cable_type).description(),
            status_label: outcome.status.label(),
            status_summary: outcome.status_summary(),
            impedance_abnormal: !outcome.impedance_matches(),
            outcome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub current: Option<TestOutcome>,
    pub history: Vec<TestHistoryEntry>,
}

#[derive(Debug, Default)]
struct SessionState {
    current: Option<TestOutcome>,
    history: TestHistory,
}

#[derive(Clone)]
pub struct TestSessionService {
    generator: OutcomeGenerator,
    state: Arc<Mutex<SessionState>>,
}

impl TestSessionService {
    pub fn new(generator: OutcomeGenerator) -> Self {
        Self {
            generator,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub async fn run_test(&self, cable_type: &str, length: f64) -> DomainResult<TestOutcome> {
        self.run_test_at(cable_type, length, Utc::now()).await
    }

    /// Generates a new outcome and archives the previous one. Rejected input
    /// leaves the session untouched.
    pub async fn run_test_at(
        &self,
        cable_type: &str,
        length: f64,
        now: DateTime<Utc>,
    ) -> DomainResult<TestOutcome> {
        let mut state = self.state.lock().await;

        let outcome = self.generator.generate(cable_type, length)?;
        if let Some(previous) = state.current.replace(outcome.clone()) {
            let entry = state.history.archive(previous, now);
            tracing::debug!("Archived test {} ({})", entry.id, entry.outcome.cable_type);
        }

        tracing::info!(
            "New test on {} ({}m): {} at quality {}",
            outcome.cable_type,
            outcome.length,
            outcome.status.as_str(),
            outcome.quality
        );
        Ok(outcome)
    }

    pub async fn current(&self) -> Option<TestOutcome> {
        self.state.lock().await.current.clone()
    }

    pub async fn current_report(&self) -> Option<TestReport> {
        self.current().await.map(TestReport::new)
    }

    pub async fn history_rows(&self, now: DateTime<Utc>) -> Vec<HistoryRow> {
        self.state.lock().await.history.rows(now)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            current: state.current.clone(),
            history: state.history.entries().to_vec(),
        }
    }
}
