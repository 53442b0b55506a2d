//! Error types shared across the application.

use crate::dictionary::DictionaryError;

/// Raised while building configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("interval table must contain at least one level")]
    EmptyIntervalTable,

    #[error("invalid interval '{0}': expected a positive number of days")]
    InvalidInterval(String),
}

/// Top-level error for operations that cross more than one boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type AppResult<T> = Result<T, AppError>;
