//! Periodic sampling driver.
//!
//! Owns the runtime that hosts the sample/evaluate timer, the sink's export
//! timer, and the persistence worker. The two timers run concurrently and
//! reach the metric source through its shared lock.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::alert::AlertRegistry;
use super::config::AgentConfig;
use super::evaluator::AlertEvaluator;
use super::persister::AlertPersister;
use super::sink::{self, MetricsSink};
use super::source::SharedSource;
use crate::error::Result;

/// Resources held while RUNNING; taken as one unit on stop.
struct Running {
    runtime: tokio::runtime::Runtime,
    shutdown_tx: broadcast::Sender<()>,
    sample_task: JoinHandle<()>,
    export_task: JoinHandle<()>,
    persist_worker: JoinHandle<()>,
}

/// Drives the periodic sample/evaluate cycle and the gauge export timer.
pub struct SampleController {
    running: Mutex<Option<Running>>,
}

impl SampleController {
    /// Start sampling: builds a dedicated runtime, then spawns the
    /// persistence worker, the sample/evaluate task, and the sink's export
    /// task. The returned controller is RUNNING.
    pub fn start(
        config: &AgentConfig,
        source: SharedSource,
        registry: Arc<Mutex<AlertRegistry>>,
        sink: MetricsSink,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("hostmon-worker")
            .build()?;

        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let (persister, persist_worker) = AlertPersister::spawn(
            runtime.handle(),
            config.alert_file.clone(),
            config.persist_queue_capacity,
        );
        let evaluator = AlertEvaluator::new(registry, persister);

        let sample_task = runtime.spawn(sample_task(
            source,
            evaluator,
            config.sample_interval_ms,
            shutdown_tx.subscribe(),
        ));
        let export_task = runtime.spawn(sink::export_task(
            sink,
            config.export_interval_ms,
            shutdown_tx.subscribe(),
        ));

        info!(
            "sample controller started (interval {} ms, export every {} ms)",
            config.sample_interval_ms, config.export_interval_ms
        );

        Ok(Self {
            running: Mutex::new(Some(Running {
                runtime,
                shutdown_tx,
                sample_task,
                export_task,
                persist_worker,
            })),
        })
    }

    /// Stop both timers and drain pending persistence writes before
    /// returning.
    ///
    /// Idempotent and safe to call from any thread (e.g. a shutdown signal
    /// handler); a second call reports the condition and does nothing else.
    pub fn stop(&self) {
        let taken = self.running.lock().take();
        let Some(running) = taken else {
            info!("sample controller is already stopped");
            return;
        };

        info!("stopping sample controller");
        let _ = running.shutdown_tx.send(());

        let Running {
            runtime,
            sample_task,
            export_task,
            persist_worker,
            ..
        } = running;

        runtime.block_on(async {
            let _ = sample_task.await;
            let _ = export_task.await;
        });

        // The sample task owned the last persister handle; with it gone the
        // worker drains the queue and exits, completing the flush.
        runtime.block_on(async {
            let _ = persist_worker.await;
        });

        info!("sample controller stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }
}

/// One tick: pull a sample from the source and evaluate every metric in it.
async fn sample_task(
    source: SharedSource,
    evaluator: AlertEvaluator,
    interval_ms: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let sample = { source.lock().sample() };
                debug!(
                    "sampled {} metric(s) for {} at {}",
                    sample.len(),
                    sample.host(),
                    sample.timestamp()
                );

                for (metric, value) in sample.iter() {
                    evaluator.evaluate(metric, value, sample.host());
                }
            }
            _ = shutdown.recv() => {
                debug!("sample task shutting down");
                break;
            }
        }
    }
}
