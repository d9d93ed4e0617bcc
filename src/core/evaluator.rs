//! Sample-against-threshold evaluation.

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use super::alert::AlertRegistry;
use super::persister::AlertPersister;

/// Result of evaluating one sampled metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Value exceeded the threshold; the alert was updated and queued for
    /// persistence.
    Breach,
    /// Value within the threshold; nothing was mutated.
    BelowThreshold,
    /// No alert is registered for this metric on this host; reported and
    /// skipped.
    Unregistered,
}

/// Evaluates sampled values against the registry and hands breaches to the
/// persister.
pub struct AlertEvaluator {
    registry: Arc<Mutex<AlertRegistry>>,
    persister: AlertPersister,
}

impl AlertEvaluator {
    pub fn new(registry: Arc<Mutex<AlertRegistry>>, persister: AlertPersister) -> Self {
        Self { registry, persister }
    }

    /// Evaluate one sampled value for `(metric, host)`.
    ///
    /// A breach is the only transition that mutates an alert after
    /// initialization: it records the value, stamps the timestamp, and
    /// queues the alert for persistence. Every breaching sample re-fires a
    /// persistence write; there is no dedup window.
    pub fn evaluate(&self, metric: &str, value: f64, host: &str) -> Evaluation {
        let mut registry = self.registry.lock();

        let Some(alert) = registry.find_mut(metric, host) else {
            debug!("no alert registered for {metric} on {host}, skipping");
            return Evaluation::Unregistered;
        };

        if value > alert.threshold {
            warn!(
                "alert {metric} for host {host} TRIGGERED: value ({value}) > threshold ({})",
                alert.threshold
            );
            alert.value = Some(value);
            alert.set_timestamp();
            let triggered = alert.clone();
            drop(registry);

            self.persister.append(vec![triggered]);
            Evaluation::Breach
        } else {
            debug!(
                "alert {metric} for host {host} not triggered: value ({value}) <= threshold ({})",
                alert.threshold
            );
            Evaluation::BelowThreshold
        }
    }
}
