//! Gauge export sink.
//!
//! Pull-based: callers register named gauges backed by callbacks, and the
//! sink polls them on its own timer, pushing one JSON payload per tick to
//! the collector endpoint. Export failures never interrupt sampling.

use log::{debug, warn};
use serde_json::json;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// A named gauge backed by a callback polled at export time.
struct Gauge {
    name: String,
    read: Box<dyn Fn() -> f64 + Send + Sync>,
}

/// Export sink owning its registered gauges and target endpoint; its
/// polling cadence is driven by the export task the controller spawns.
pub struct MetricsSink {
    service: String,
    endpoint: String,
    gauges: Vec<Gauge>,
}

impl MetricsSink {
    pub fn new(service: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            endpoint: endpoint.into(),
            gauges: Vec::new(),
        }
    }

    /// Register a named gauge; `read` returns the gauge's current value
    /// when polled.
    pub fn register_gauge<F>(&mut self, name: impl Into<String>, read: F)
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.gauges.push(Gauge {
            name: name.into(),
            read: Box::new(read),
        });
    }

    pub fn gauge_count(&self) -> usize {
        self.gauges.len()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Poll every registered gauge and build the export payload.
    fn payload(&self) -> serde_json::Value {
        let gauges: serde_json::Map<String, serde_json::Value> = self
            .gauges
            .iter()
            .map(|gauge| (gauge.name.clone(), json!((gauge.read)())))
            .collect();

        json!({
            "service": self.service,
            "timestamp_ms": chrono::Utc::now().timestamp_millis(),
            "gauges": gauges,
        })
    }
}

/// The sink's own periodic timer: polls the gauges and pushes the payload.
pub(crate) async fn export_task(
    sink: MetricsSink,
    interval_ms: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    let client = reqwest::Client::new();

    let mut ticker = interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let payload = sink.payload();

                match client.post(&sink.endpoint).json(&payload).send().await {
                    Ok(response) if response.status().is_success() => {
                        debug!("exported {} gauge(s) to {}", sink.gauge_count(), sink.endpoint);
                    }
                    Ok(response) => {
                        warn!("collector rejected gauge export: {}", response.status());
                    }
                    Err(e) => {
                        warn!("failed to export gauges: {e}");
                    }
                }
            }
            _ = shutdown.recv() => {
                debug!("export task shutting down");
                break;
            }
        }
    }
}
