use thiserror::Error;

/// Top-level error type shared by handlewatch crates.
#[derive(Error, Debug)]
pub enum HandlewatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown probe module: {0}")]
    UnknownModule(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HandlewatchError>;
