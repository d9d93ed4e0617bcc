use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::Result;
use clap::{Arg, Command};
use parking_lot::Mutex;

use hostmon::core::source::{self, Platform};
use hostmon::core::{
    classify, source_for, AgentConfig, AlertRegistry, MetricsSink, SampleController,
    ThresholdTable,
};

fn main() -> Result<()> {
    hostmon::init_logging();

    let matches = Command::new("hostmon")
        .version("0.1.0")
        .about("Host telemetry agent: samples system metrics, exports gauges, and raises threshold alerts")
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("NAME")
                .help("Host identity for samples and alerts (defaults to the system hostname)")
        )
        .arg(
            Arg::new("platform")
                .long("platform")
                .value_name("PLATFORM")
                .default_value("desktop")
                .help("Metric source variant: desktop or mobile")
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Sample/evaluate tick interval in milliseconds (default 5000)")
        )
        .arg(
            Arg::new("export-interval-ms")
                .long("export-interval-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Gauge export interval in milliseconds (default 5000)")
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help("Collector endpoint for gauge export (default http://127.0.0.1:4318/v1/metrics)")
        )
        .arg(
            Arg::new("alert-file")
                .long("alert-file")
                .value_name("PATH")
                .help("Append-only alert record file (default output/alerts.json)")
        )
        .get_matches();

    let defaults = AgentConfig::default();

    let host = matches
        .get_one::<String>("host")
        .cloned()
        .or_else(sysinfo::System::host_name)
        .unwrap_or(defaults.host);

    let platform: Platform = matches
        .get_one::<String>("platform")
        .expect("has default")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let config = AgentConfig {
        host,
        platform,
        sample_interval_ms: matches
            .get_one::<u64>("interval-ms")
            .copied()
            .unwrap_or(defaults.sample_interval_ms),
        export_interval_ms: matches
            .get_one::<u64>("export-interval-ms")
            .copied()
            .unwrap_or(defaults.export_interval_ms),
        export_endpoint: matches
            .get_one::<String>("endpoint")
            .cloned()
            .unwrap_or(defaults.export_endpoint),
        alert_file: matches
            .get_one::<String>("alert-file")
            .map(PathBuf::from)
            .unwrap_or(defaults.alert_file),
        persist_queue_capacity: defaults.persist_queue_capacity,
    };

    // Platform source, selected once; startup misconfiguration fails fast
    let metric_source = source_for(config.platform, config.host.clone())?;
    let supported = metric_source.supported_metrics();
    let shared = source::shared(metric_source);

    // One alert per supported metric, thresholds resolved by device category
    let category = classify(&config.host);
    let thresholds = ThresholdTable::new();
    let mut registry = AlertRegistry::new(config.host.clone());
    registry.initialize_alerts(supported, category, &thresholds);
    let registry = Arc::new(Mutex::new(registry));

    // The sink polls the same source on its own timer
    let mut sink = MetricsSink::new(config.service_name(), config.export_endpoint.clone());
    for &metric in supported {
        let shared = shared.clone();
        sink.register_gauge(metric, move || {
            shared.lock().sample().get(metric).unwrap_or(0.0)
        });
    }

    let controller = SampleController::start(&config, shared, registry, sink)?;
    log::info!("{}'s system monitor started, press Ctrl+C to stop", config.host);

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })?;
    let _ = stop_rx.recv();

    controller.stop();
    Ok(())
}
