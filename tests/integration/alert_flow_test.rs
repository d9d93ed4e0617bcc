use std::sync::Arc;

use parking_lot::Mutex;

use hostmon::core::source::DESKTOP_METRICS;
use hostmon::core::{
    classify, AlertEvaluator, AlertPersister, AlertRegistry, DeviceCategory, Evaluation,
    ThresholdTable, ABSOLUTE_DEFAULT_THRESHOLD,
};

const HOST: &str = "Windows";

fn desktop_registry() -> AlertRegistry {
    let mut registry = AlertRegistry::new(HOST);
    registry.initialize_alerts(DESKTOP_METRICS, classify(HOST), &ThresholdTable::new());
    registry
}

#[test]
fn test_classification_drives_threshold_resolution() {
    assert_eq!(classify(HOST), DeviceCategory::Desktop);
    assert_eq!(classify("unknown-vendor-xyz"), DeviceCategory::Unknown);

    let table = ThresholdTable::new();
    assert_eq!(
        table.resolve(DeviceCategory::Desktop, "cpu_usage", ABSOLUTE_DEFAULT_THRESHOLD),
        50.0
    );
    assert_eq!(
        table.resolve(DeviceCategory::Unknown, "cpu_usage", ABSOLUTE_DEFAULT_THRESHOLD),
        ABSOLUTE_DEFAULT_THRESHOLD
    );
}

#[test]
fn test_registry_initialized_for_every_supported_metric() {
    let registry = desktop_registry();

    assert_eq!(registry.alerts().len(), DESKTOP_METRICS.len());
    for metric in DESKTOP_METRICS {
        let alert = registry
            .find(metric, HOST)
            .unwrap_or_else(|| panic!("missing alert for {metric}"));
        assert!(alert.value.is_none());
        assert!(alert.timestamp.is_none());
    }
}

#[test]
fn test_breach_flow_end_to_end() {
    let registry = Arc::new(Mutex::new(desktop_registry()));
    let (persister, mut rx) = AlertPersister::channel(8);
    let evaluator = AlertEvaluator::new(registry.clone(), persister);

    assert_eq!(evaluator.evaluate("cpu_usage", 75.0, HOST), Evaluation::Breach);
    assert_eq!(
        evaluator.evaluate("memory_usage", 10.0, HOST),
        Evaluation::BelowThreshold
    );
    assert_eq!(
        evaluator.evaluate("nonexistent_metric", 999.0, HOST),
        Evaluation::Unregistered
    );

    // only the breach reached the persistence queue
    let batch = rx.try_recv().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].metric, "cpu_usage");
    assert_eq!(batch[0].value, Some(75.0));
    assert!(batch[0].timestamp.is_some());
    assert!(rx.try_recv().is_err());

    // the registry reflects the breach and nothing else
    let registry = registry.lock();
    assert_eq!(registry.find("cpu_usage", HOST).unwrap().value, Some(75.0));
    assert!(registry.find("memory_usage", HOST).unwrap().value.is_none());
}

#[test]
fn test_reconfigured_threshold_changes_breach_outcome() {
    let registry = Arc::new(Mutex::new(desktop_registry()));
    let (persister, _rx) = AlertPersister::channel(8);
    let evaluator = AlertEvaluator::new(registry.clone(), persister);

    assert_eq!(
        evaluator.evaluate("cpu_usage", 60.0, HOST),
        Evaluation::Breach
    );

    registry.lock().set_threshold("cpu_usage", 90.0);

    assert_eq!(
        evaluator.evaluate("cpu_usage", 60.0, HOST),
        Evaluation::BelowThreshold
    );
}
