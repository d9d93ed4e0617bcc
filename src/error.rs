use std::io;
use thiserror::Error;

/// Custom error type for the hostmon agent
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the hostmon agent
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AgentError::Config(msg.into())
    }

    /// Create a metric collection error
    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        AgentError::MetricCollection(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AgentError::Other(msg.into())
    }
}
