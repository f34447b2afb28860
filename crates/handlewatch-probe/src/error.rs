//! Error types for the handlewatch-probe crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Probe cancelled")]
    Cancelled,

    #[error("Scan deadline already elapsed")]
    DeadlineElapsed,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
