//! run::report
//!
//! The end-of-cycle run report.
//!
//! Field names on the wire match what downstream monitoring already
//! parses (`timeMs`, `epochMs`, `eventId`, `totalNewRows`); the Rust
//! side keeps snake_case. Emission is fire-and-forget through
//! [`ReportSink`] — a report that cannot be delivered never fails the
//! cycle that produced it.

use serde::{Deserialize, Serialize};

/// Summary of one completed trigger cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Wall-clock duration of the cycle, in milliseconds.
    #[serde(rename = "timeMs")]
    pub duration_ms: u64,
    /// Unix epoch of cycle completion, in milliseconds.
    #[serde(rename = "epochMs")]
    pub epoch_ms: i64,
    /// Correlation id of the triggering event.
    #[serde(rename = "eventId")]
    pub event_id: String,
    /// Rows landed on the trunk by ingestion this cycle.
    #[serde(rename = "totalNewRows")]
    pub total_new_rows: u64,
}

/// Destination for cycle reports.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &RunReport);
}

/// Sink that writes the report as a JSON log line, where a log-scraping
/// monitor picks it up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn emit(&self, report: &RunReport) {
        match serde_json::to_string(report) {
            Ok(json) => tracing::info!(report = %json, "Cycle report"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize cycle report"),
        }
    }
}

/// Sink that records reports in memory for test verification.
#[derive(Debug, Default, Clone)]
pub struct MemoryReportSink {
    reports: std::sync::Arc<std::sync::Mutex<Vec<RunReport>>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.lock().expect("sink lock poisoned").clone()
    }
}

impl ReportSink for MemoryReportSink {
    fn emit(&self, report: &RunReport) {
        self.reports
            .lock()
            .expect("sink lock poisoned")
            .push(report.clone());
    }
}
