//! Agent configuration.
//!
//! An explicit value passed into the controller and sink at construction,
//! with documented defaults. There is no process-wide or environment-derived
//! state.

use std::path::PathBuf;

use super::source::Platform;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Host identity samples and alerts are tagged with.
    pub host: String,
    /// Metric source variant.
    pub platform: Platform,
    /// Sample/evaluate tick interval.
    pub sample_interval_ms: u64,
    /// Gauge export tick interval (the sink's own timer).
    pub export_interval_ms: u64,
    /// Collector endpoint receiving the gauge payload.
    pub export_endpoint: String,
    /// Append-only alert record file.
    pub alert_file: PathBuf,
    /// Bound on the persistence queue between evaluator and writer.
    pub persist_queue_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            platform: Platform::Desktop,
            sample_interval_ms: 5_000,
            export_interval_ms: 5_000,
            export_endpoint: "http://127.0.0.1:4318/v1/metrics".to_string(),
            alert_file: PathBuf::from("output/alerts.json"),
            persist_queue_capacity: 64,
        }
    }
}

impl AgentConfig {
    /// Service name the exporter reports under.
    pub fn service_name(&self) -> String {
        format!("{}-system-monitor", self.host)
    }
}
