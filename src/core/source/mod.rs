//! Platform metric sources.
//!
//! One `MetricSource` variant per platform, selected once at construction.
//! Reads are stateful (previous-tick counters inside the platform readers),
//! so every caller goes through one shared lock.

mod desktop;
mod mobile;

pub use desktop::DesktopSource;
pub use mobile::MobileSource;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

pub const CPU_USAGE: &str = "cpu_usage";
pub const MEMORY_USAGE: &str = "memory_usage";
pub const DISK_USAGE: &str = "disk_usage";
pub const DISK_READ: &str = "disk_read";
pub const DISK_WRITE: &str = "disk_write";
pub const TEMPERATURE: &str = "temperature";
pub const NETWORK_RECV: &str = "network_recv";
pub const NETWORK_SENT: &str = "network_sent";

/// Metric names reported by the desktop source.
pub const DESKTOP_METRICS: &[&str] = &[
    CPU_USAGE,
    MEMORY_USAGE,
    DISK_USAGE,
    DISK_READ,
    DISK_WRITE,
    NETWORK_RECV,
    NETWORK_SENT,
];

/// Metric names reported by the mobile source.
pub const MOBILE_METRICS: &[&str] = &[
    CPU_USAGE,
    MEMORY_USAGE,
    TEMPERATURE,
    NETWORK_RECV,
    NETWORK_SENT,
];

/// One tick's worth of measured metric values for a host.
#[derive(Debug, Clone)]
pub struct SampleSet {
    host: String,
    timestamp: i64,
    values: Vec<(&'static str, f64)>,
}

impl SampleSet {
    pub fn new(host: impl Into<String>, values: Vec<(&'static str, f64)>) -> Self {
        Self {
            host: host.into(),
            timestamp: chrono::Utc::now().timestamp(),
            values,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// A platform's metric reader.
pub trait MetricSource: Send {
    /// Take one snapshot of all supported metrics. Unreadable metrics
    /// report the 0.0 sentinel and log; `sample` itself never fails.
    fn sample(&mut self) -> SampleSet;

    /// Host identity the samples are tagged with.
    fn identity(&self) -> &str;

    /// Contract constant: the metric names this platform reports.
    fn supported_metrics(&self) -> &'static [&'static str];
}

/// Shared handle serializing source access across the sample and export
/// timers.
pub type SharedSource = Arc<Mutex<Box<dyn MetricSource>>>;

pub fn shared(source: Box<dyn MetricSource>) -> SharedSource {
    Arc::new(Mutex::new(source))
}

/// Platform variant, selected once at agent construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Mobile,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            _ => Err(format!("unknown platform: {s}")),
        }
    }
}

/// Construct the metric source for `platform`, reporting for `host`.
///
/// Fails fast on startup misconfiguration (e.g. no usable network
/// interface) rather than producing a half-initialized source.
pub fn source_for(platform: Platform, host: impl Into<String>) -> Result<Box<dyn MetricSource>> {
    let host = host.into();
    Ok(match platform {
        Platform::Desktop => Box::new(DesktopSource::new(host)?),
        Platform::Mobile => Box::new(MobileSource::new(host)?),
    })
}

pub(crate) fn is_loopback(interface: &str) -> bool {
    let lower = interface.to_lowercase();
    lower == "lo" || lower.starts_with("lo0") || lower.contains("loopback")
}
