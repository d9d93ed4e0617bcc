//! Per-category metric thresholds.
//!
//! Built once at startup and read-only afterwards; unconfigured
//! (category, metric) pairs fall back to the absolute default.

use std::collections::HashMap;

use super::device::DeviceCategory;

/// Fallback threshold applied when a (category, metric) pair is unconfigured.
pub const ABSOLUTE_DEFAULT_THRESHOLD: f64 = 80.0;

/// Static mapping from device category to per-metric threshold values.
#[derive(Debug)]
pub struct ThresholdTable {
    table: HashMap<DeviceCategory, HashMap<&'static str, f64>>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        let mut table = HashMap::new();

        table.insert(
            DeviceCategory::Mobile,
            HashMap::from([
                ("cpu_usage", 0.0),
                ("memory_usage", 60.0),
                ("temperature", 0.0),
                ("network_recv", 40_000.0),
                ("network_sent", 40_000.0),
            ]),
        );

        table.insert(
            DeviceCategory::Desktop,
            HashMap::from([
                ("cpu_usage", 50.0),
                ("memory_usage", 50.0),
                ("disk_usage", 50.0),
                ("disk_read", 10_000.0),
                ("disk_write", 10_000.0),
                ("network_recv", 100_000.0),
                ("network_sent", 100_000.0),
            ]),
        );

        table.insert(
            DeviceCategory::Unknown,
            HashMap::from([
                ("cpu_usage", ABSOLUTE_DEFAULT_THRESHOLD),
                ("memory_usage", ABSOLUTE_DEFAULT_THRESHOLD),
                ("network_recv", ABSOLUTE_DEFAULT_THRESHOLD),
                ("network_sent", ABSOLUTE_DEFAULT_THRESHOLD),
            ]),
        );

        Self { table }
    }

    /// Threshold for `metric` under `category`, or `fallback` when the
    /// category or the metric is absent from the table.
    pub fn resolve(&self, category: DeviceCategory, metric: &str, fallback: f64) -> f64 {
        self.table
            .get(&category)
            .and_then(|metrics| metrics.get(metric))
            .copied()
            .unwrap_or(fallback)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_desktop_cpu() {
        let table = ThresholdTable::new();
        assert_eq!(
            table.resolve(DeviceCategory::Desktop, "cpu_usage", ABSOLUTE_DEFAULT_THRESHOLD),
            50.0
        );
    }

    #[test]
    fn test_resolve_unknown_category_uses_absolute_default() {
        let table = ThresholdTable::new();
        assert_eq!(
            table.resolve(DeviceCategory::Unknown, "cpu_usage", ABSOLUTE_DEFAULT_THRESHOLD),
            ABSOLUTE_DEFAULT_THRESHOLD
        );
    }

    #[test]
    fn test_resolve_missing_metric_falls_back() {
        let table = ThresholdTable::new();
        // temperature is only configured for mobile
        assert_eq!(
            table.resolve(DeviceCategory::Desktop, "temperature", ABSOLUTE_DEFAULT_THRESHOLD),
            ABSOLUTE_DEFAULT_THRESHOLD
        );
        assert_eq!(table.resolve(DeviceCategory::Mobile, "temperature", 80.0), 0.0);
    }

    #[test]
    fn test_resolve_mobile_memory() {
        let table = ThresholdTable::new();
        assert_eq!(table.resolve(DeviceCategory::Mobile, "memory_usage", 80.0), 60.0);
    }
}
