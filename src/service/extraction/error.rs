//! Error types for the extraction pipeline

use thiserror::Error;

/// Input rejected before any job is submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Either paper_text or paper_url must be provided")]
    MissingInput,

    #[error("URL analysis not yet implemented. Please paste the paper text directly.")]
    UrlUnsupported,

    #[error("Paper text too short. Please provide at least {min} characters of research content.")]
    TextTooShort { length: usize, min: usize },
}

impl ValidationError {
    /// Next step offered to the user alongside the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ValidationError::UrlUnsupported => {
                Some("Copy and paste the research paper content into the text field.")
            }
            _ => None,
        }
    }
}

/// Wire-level failure talking to the extraction backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Submission(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job did not complete within timeout ({} seconds)", .waited.as_secs())]
    Timeout {
        attempts: u32,
        waited: std::time::Duration,
    },
}
