//! Alert records and the per-host alert registry.

use log::warn;
use serde::{Deserialize, Serialize};

use super::device::DeviceCategory;
use super::thresholds::{ThresholdTable, ABSOLUTE_DEFAULT_THRESHOLD};

/// Monitored state for one (host, metric) pair.
///
/// `value` and `timestamp` stay `None` until the alert first breaches.
/// Identity is the (metric, host) pair; a registry never holds two alerts
/// with the same identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub metric: String,
    pub threshold: f64,
    pub value: Option<f64>,
    pub timestamp: Option<String>,
    pub host: Option<String>,
}

impl Alert {
    pub fn new(metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            value: None,
            timestamp: None,
            host: None,
        }
    }

    /// Stamp the alert with the current local time.
    pub fn set_timestamp(&mut self) {
        self.timestamp = Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    }
}

/// Outcome of a registry mutation.
///
/// Duplicates and misses are reported conditions, never failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryOutcome {
    Inserted,
    Duplicate,
    Removed,
    Missing,
    Updated,
}

/// Ordered collection of alerts, one per supported metric, scoped to a
/// single host. Constructed at agent startup and alive for the process
/// lifetime; only members' `value`/`timestamp`/`threshold` mutate afterwards.
#[derive(Debug)]
pub struct AlertRegistry {
    host: String,
    alerts: Vec<Alert>,
}

impl AlertRegistry {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            alerts: Vec::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Clear the registry and create one alert per supported metric, with
    /// the threshold pre-resolved from the table via the host's category.
    pub fn initialize_alerts(
        &mut self,
        supported_metrics: &[&str],
        category: DeviceCategory,
        table: &ThresholdTable,
    ) {
        self.alerts.clear();

        for name in supported_metrics {
            let threshold = table.resolve(category, name, ABSOLUTE_DEFAULT_THRESHOLD);
            let mut alert = Alert::new(*name, threshold);
            alert.host = Some(self.host.clone());
            self.add_alert(alert);
        }
    }

    /// Insert an alert unless one with the same identity already exists.
    pub fn add_alert(&mut self, alert: Alert) -> RegistryOutcome {
        if self.position(&alert.metric, alert.host.as_deref()).is_some() {
            warn!("alert for {} already exists", alert.metric);
            return RegistryOutcome::Duplicate;
        }
        self.alerts.push(alert);
        RegistryOutcome::Inserted
    }

    /// Remove the alert with the given identity if present.
    pub fn remove_alert(&mut self, metric: &str, host: Option<&str>) -> RegistryOutcome {
        match self.position(metric, host) {
            Some(idx) => {
                self.alerts.remove(idx);
                RegistryOutcome::Removed
            }
            None => {
                warn!("no alert for {metric} to remove");
                RegistryOutcome::Missing
            }
        }
    }

    /// Look up an alert by identity. Absence is a normal outcome: a metric
    /// may simply have no configured alert on this host.
    pub fn find(&self, metric: &str, host: &str) -> Option<&Alert> {
        self.alerts
            .iter()
            .find(|a| a.metric == metric && a.host.as_deref() == Some(host))
    }

    pub fn find_mut(&mut self, metric: &str, host: &str) -> Option<&mut Alert> {
        self.alerts
            .iter_mut()
            .find(|a| a.metric == metric && a.host.as_deref() == Some(host))
    }

    /// Update the threshold of the matching alert, or register a new alert
    /// with that threshold and no host-qualified value.
    pub fn set_threshold(&mut self, metric: &str, threshold: f64) -> RegistryOutcome {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.metric == metric) {
            alert.threshold = threshold;
            RegistryOutcome::Updated
        } else {
            self.add_alert(Alert::new(metric, threshold))
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn alerts_for_metric(&self, metric: &str) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.metric == metric).collect()
    }

    fn position(&self, metric: &str, host: Option<&str>) -> Option<usize> {
        self.alerts
            .iter()
            .position(|a| a.metric == metric && a.host.as_deref() == host)
    }
}
