//! Error types for the simulation.

use thiserror::Error;

use crate::capacitor::CapacitorId;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config could not be parsed
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config parsed but makes no sense
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Churn referred to a capacitor that is not placed
    #[error("Unknown capacitor: {0}")]
    UnknownCapacitor(CapacitorId),
}
