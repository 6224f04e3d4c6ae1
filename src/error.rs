use thiserror::Error;

/// Main error type for nsdoc operations
#[derive(Error, Debug)]
pub enum NsdocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Loader error: {0}")]
    Loader(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, NsdocError>;
