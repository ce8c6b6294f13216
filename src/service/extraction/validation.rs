//! Input validation for paper analysis requests

use crate::model::{ExtractionRequest, JobSubmission};

use super::error::ValidationError;

/// Minimum paper text length, in characters
pub const MIN_TEXT_LENGTH: usize = 100;

const DEFAULT_EXTRACTION_TYPE: &str = "all";
const CUSTOM_PROMPT_PROJECT: &str = "custom-prompt";

/// Presence of an analysis input; whitespace counts and is judged by length
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Validate a request and build the job submission for it
///
/// Text is the only supported analysis input. A URL alone is rejected; a URL
/// given together with text is forwarded for provenance.
pub fn validate_request(request: &ExtractionRequest) -> Result<JobSubmission, ValidationError> {
    let text = provided(&request.paper_text);
    let url = provided(&request.paper_url);

    let text = match (text, url) {
        (None, None) => return Err(ValidationError::MissingInput),
        (None, Some(_)) => return Err(ValidationError::UrlUnsupported),
        (Some(text), _) => text,
    };

    let length = text.chars().count();
    if length < MIN_TEXT_LENGTH {
        return Err(ValidationError::TextTooShort {
            length,
            min: MIN_TEXT_LENGTH,
        });
    }

    Ok(JobSubmission {
        paper_url: url.unwrap_or_default().to_string(),
        paper_text: text.to_string(),
        extraction_type: non_blank(&request.extraction_type)
            .unwrap_or(DEFAULT_EXTRACTION_TYPE)
            .to_string(),
        project_id: non_blank(&request.custom_prompt).map(|_| CUSTOM_PROMPT_PROJECT.to_string()),
    })
}
