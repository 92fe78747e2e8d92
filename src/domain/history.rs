// Test history domain model
use super::outcome::{format_meters, TestOutcome, TestStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Frozen snapshot of a past outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestHistoryEntry {
    pub id: u64,
    pub archived_at: DateTime<Utc>,
    pub outcome: TestOutcome,
}

/// Flattened view of an entry as the history table shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub id: u64,
    pub time: String,
    pub cable_type: String,
    pub length: String,
    pub result: TestStatus,
    pub fault_at: Option<String>,
    pub quality: u8,
}

impl TestHistoryEntry {
    pub fn to_row(&self, now: DateTime<Utc>) -> HistoryRow {
        HistoryRow {
            id: self.id,
            time: relative_label(self.archived_at, now),
            cable_type: self.outcome.cable_type.clone(),
            length: format!("{}m", self.outcome.length),
            result: self.outcome.status,
            fault_at: self.outcome.fault_distance.map(format_meters),
            quality: self.outcome.quality,
        }
    }
}

/// Newest-first list; insertion order is the only ordering
#[derive(Debug, Clone, Default)]
pub struct TestHistory {
    entries: Vec<TestHistoryEntry>,
    next_id: u64,
}

impl TestHistory {
    pub fn archive(&mut self, outcome: TestOutcome, at: DateTime<Utc>) -> &TestHistoryEntry {
        self.next_id += 1;
        let entry = TestHistoryEntry {
            id: self.next_id,
            archived_at: at,
            outcome,
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[TestHistoryEntry] {
        &self.entries
    }

    pub fn rows(&self, now: DateTime<Utc>) -> Vec<HistoryRow> {
        self.entries.iter().map(|e| e.to_row(now)).collect()
    }
}

/// "Just now", "5 minutes ago", "Yesterday" and so on; falls back to the
/// calendar date after a week
pub fn relative_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}
