//! Mobile metric source backed by sysinfo.

use log::warn;
use sysinfo::{Components, CpuRefreshKind, MemoryRefreshKind, Networks, RefreshKind, System};

use super::{
    is_loopback, MetricSource, SampleSet, CPU_USAGE, MEMORY_USAGE, MOBILE_METRICS, NETWORK_RECV,
    NETWORK_SENT, TEMPERATURE,
};
use crate::error::{AgentError, Result};

/// Samples CPU, memory, temperature, and network counters for a mobile
/// device.
pub struct MobileSource {
    host: String,
    system: System,
    components: Components,
    networks: Networks,
    interface: String,
}

impl MobileSource {
    pub fn new(host: String) -> Result<Self> {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        let system = System::new_with_specifics(refresh_kind);
        let components = Components::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        let interface = networks
            .iter()
            .map(|(name, _)| name)
            .find(|name| !is_loopback(name))
            .cloned()
            .ok_or_else(|| AgentError::config("no usable network interface found"))?;

        Ok(Self {
            host,
            system,
            components,
            networks,
            interface,
        })
    }

    fn cpu_usage(&mut self) -> f64 {
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage() as f64
    }

    fn memory_usage(&mut self) -> f64 {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            warn!("total memory reported as 0, using sentinel");
            return 0.0;
        }
        (self.system.used_memory() as f64 / total as f64) * 100.0
    }

    /// Hottest readable sensor, in degrees Celsius.
    fn temperature(&self) -> f64 {
        let hottest = self
            .components
            .iter()
            .filter_map(|component| component.temperature())
            .fold(None::<f32>, |max, t| Some(max.map_or(t, |m| m.max(t))));

        match hottest {
            Some(t) => t as f64,
            None => {
                warn!("no temperature sensor readable, using sentinel");
                0.0
            }
        }
    }

    fn network_totals(&self) -> (f64, f64) {
        match self
            .networks
            .iter()
            .find(|(name, _)| name.as_str() == self.interface)
        {
            Some((_, data)) => (
                data.total_received() as f64,
                data.total_transmitted() as f64,
            ),
            None => {
                warn!("interface {} disappeared, using sentinel", self.interface);
                (0.0, 0.0)
            }
        }
    }
}

impl MetricSource for MobileSource {
    fn sample(&mut self) -> SampleSet {
        let cpu = self.cpu_usage();
        let memory = self.memory_usage();

        self.components.refresh(true);
        let temperature = self.temperature();

        self.networks.refresh(true);
        let (network_recv, network_sent) = self.network_totals();

        SampleSet::new(
            self.host.clone(),
            vec![
                (CPU_USAGE, cpu),
                (MEMORY_USAGE, memory),
                (TEMPERATURE, temperature),
                (NETWORK_RECV, network_recv),
                (NETWORK_SENT, network_sent),
            ],
        )
    }

    fn identity(&self) -> &str {
        &self.host
    }

    fn supported_metrics(&self) -> &'static [&'static str] {
        MOBILE_METRICS
    }
}
