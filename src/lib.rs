// Hostmon Library - Public API

// Re-export error types
pub mod error;
pub use error::{AgentError, Result};

// Module declarations
pub mod core;

// Re-export commonly used types
pub use crate::core::config::AgentConfig;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
