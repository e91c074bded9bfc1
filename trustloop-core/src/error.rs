#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Correction error: {0}")]
    Correction(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrustError>;
