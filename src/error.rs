//! Error handling for the career mirror matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerMirrorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Pattern compilation error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Skill matcher construction error: {0}")]
    Matcher(String),

    #[error("Similarity error: {0}")]
    Similarity(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, CareerMirrorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for CareerMirrorError {
    fn from(err: anyhow::Error) -> Self {
        CareerMirrorError::AnalysisFailed(err.to_string())
    }
}

impl From<aho_corasick::BuildError> for CareerMirrorError {
    fn from(err: aho_corasick::BuildError) -> Self {
        CareerMirrorError::Matcher(err.to_string())
    }
}
