// Core sampling and alerting runtime

pub mod alert;
pub mod config;
pub mod controller;
pub mod device;
pub mod evaluator;
pub mod persister;
pub mod sink;
pub mod source;
pub mod thresholds;

// Re-export commonly used items
pub use alert::{Alert, AlertRegistry, RegistryOutcome};
pub use config::AgentConfig;
pub use controller::SampleController;
pub use device::{classify, DeviceCategory};
pub use evaluator::{AlertEvaluator, Evaluation};
pub use persister::AlertPersister;
pub use sink::MetricsSink;
pub use source::{source_for, MetricSource, Platform, SampleSet, SharedSource};
pub use thresholds::{ThresholdTable, ABSOLUTE_DEFAULT_THRESHOLD};
