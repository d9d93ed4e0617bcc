use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::TempDir;

use hostmon::core::source::{self, MetricSource, SampleSet};
use hostmon::core::{
    classify, Alert, AgentConfig, AlertRegistry, MetricsSink, SampleController, ThresholdTable,
};

const HOST: &str = "integration-host";

/// Fixed-value source: cpu breaches the unknown-category default (80.0),
/// memory does not.
struct FakeSource {
    host: String,
}

impl MetricSource for FakeSource {
    fn sample(&mut self) -> SampleSet {
        SampleSet::new(
            self.host.clone(),
            vec![("cpu_usage", 95.0), ("memory_usage", 10.0)],
        )
    }

    fn identity(&self) -> &str {
        &self.host
    }

    fn supported_metrics(&self) -> &'static [&'static str] {
        &["cpu_usage", "memory_usage"]
    }
}

fn start_controller(alert_file: std::path::PathBuf) -> SampleController {
    let config = AgentConfig {
        host: HOST.to_string(),
        sample_interval_ms: 50,
        export_interval_ms: 60_000,
        // nothing listens here; export failures must not disturb sampling
        export_endpoint: "http://127.0.0.1:9/v1/metrics".to_string(),
        alert_file,
        ..Default::default()
    };

    let fake: Box<dyn MetricSource> = Box::new(FakeSource {
        host: HOST.to_string(),
    });
    let supported = fake.supported_metrics();
    let shared = source::shared(fake);

    let mut registry = AlertRegistry::new(HOST);
    registry.initialize_alerts(supported, classify(HOST), &ThresholdTable::new());
    let registry = Arc::new(Mutex::new(registry));

    let mut sink = MetricsSink::new(config.service_name(), config.export_endpoint.clone());
    for &metric in supported {
        let shared = shared.clone();
        sink.register_gauge(metric, move || {
            shared.lock().sample().get(metric).unwrap_or(0.0)
        });
    }

    SampleController::start(&config, shared, registry, sink).unwrap()
}

#[test]
fn test_controller_samples_evaluates_and_persists() {
    let dir = TempDir::new().unwrap();
    let alert_file = dir.path().join("alerts.json");

    let controller = start_controller(alert_file.clone());
    assert!(controller.is_running());

    std::thread::sleep(Duration::from_millis(250));
    controller.stop();
    assert!(!controller.is_running());

    // cpu_usage (95.0 > 80.0) breached on every tick; each line is a
    // complete JSON array
    let contents = std::fs::read_to_string(&alert_file).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(!lines.is_empty());

    for line in lines {
        let batch: Vec<Alert> = serde_json::from_str(line).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].metric, "cpu_usage");
        assert_eq!(batch[0].value, Some(95.0));
        assert_eq!(batch[0].host.as_deref(), Some(HOST));
    }
}

#[test]
fn test_stop_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let controller = start_controller(dir.path().join("alerts.json"));

    std::thread::sleep(Duration::from_millis(100));
    controller.stop();

    // second stop reports and performs no further cancellation or flush
    controller.stop();
    assert!(!controller.is_running());
}
