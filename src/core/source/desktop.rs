//! Desktop metric source backed by sysinfo.

use log::warn;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use super::{
    is_loopback, MetricSource, SampleSet, CPU_USAGE, DESKTOP_METRICS, DISK_READ, DISK_USAGE,
    DISK_WRITE, MEMORY_USAGE, NETWORK_RECV, NETWORK_SENT,
};
use crate::error::{AgentError, Result};

/// Samples CPU, memory, disk space, disk I/O, and network counters for a
/// desktop host.
///
/// CPU usage and per-refresh disk I/O are delta-based: sysinfo keeps the
/// previous-tick state inside `System`/`Disks`, which is why the source
/// must sit behind a single lock.
pub struct DesktopSource {
    host: String,
    system: System,
    disks: Disks,
    networks: Networks,
    interface: String,
}

impl DesktopSource {
    /// Fails when no non-loopback network interface exists: delta-based
    /// metrics have no valid baseline without one.
    pub fn new(host: String) -> Result<Self> {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        let system = System::new_with_specifics(refresh_kind);
        let disks = Disks::new_with_refreshed_list();
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
            disks,
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

    /// Space usage of the primary disk, in percent.
    fn disk_usage(&self) -> f64 {
        match self.disks.list().first() {
            Some(disk) => {
                let total = disk.total_space();
                if total == 0 {
                    return 0.0;
                }
                let used = total.saturating_sub(disk.available_space());
                (used as f64 / total as f64) * 100.0
            }
            None => {
                warn!("no disks available, using sentinel");
                0.0
            }
        }
    }

    /// Bytes read/written on the primary disk since the previous refresh.
    fn disk_io(&self) -> (f64, f64) {
        match self.disks.list().first() {
            Some(disk) => {
                let usage = disk.usage();
                (usage.read_bytes as f64, usage.written_bytes as f64)
            }
            None => (0.0, 0.0),
        }
    }

    /// Cumulative received/sent byte totals of the chosen interface.
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

impl MetricSource for DesktopSource {
    fn sample(&mut self) -> SampleSet {
        let cpu = self.cpu_usage();
        let memory = self.memory_usage();

        self.disks.refresh(true);
        let disk = self.disk_usage();
        let (disk_read, disk_write) = self.disk_io();

        self.networks.refresh(true);
        let (network_recv, network_sent) = self.network_totals();

        SampleSet::new(
            self.host.clone(),
            vec![
                (CPU_USAGE, cpu),
                (MEMORY_USAGE, memory),
                (DISK_USAGE, disk),
                (DISK_READ, disk_read),
                (DISK_WRITE, disk_write),
                (NETWORK_RECV, network_recv),
                (NETWORK_SENT, network_sent),
            ],
        )
    }

    fn identity(&self) -> &str {
        &self.host
    }

    fn supported_metrics(&self) -> &'static [&'static str] {
        DESKTOP_METRICS
    }
}
