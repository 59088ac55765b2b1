use thiserror::Error;

/// Errors raised at the ingestion/config boundary.
///
/// The per-tick pipeline never produces these; it degrades to fallback
/// headings instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::Io(_) => true,
            CoreError::Json(_) => false,
            CoreError::Yaml(_) => false,
            CoreError::UnsupportedFormat { .. } => false,
            // Caller can fall back to a preset
            CoreError::InvalidConfig(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
