use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("External lookup failed: {0}")]
    ExternalLookup(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
