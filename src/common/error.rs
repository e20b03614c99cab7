use thiserror::Error;

/// Boundary-level failures. Individual lookup faults never surface here;
/// they are folded into [`crate::common::types::LookupOutcome::Failure`].
#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },
}

pub type Result<T> = std::result::Result<T, EnricherError>;
