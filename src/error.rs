use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Alert surface error: {0}")]
    AlertSurface(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    /// Data-access failures that the next scheduler tick is expected to
    /// recover from on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Io(_) | AppError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
