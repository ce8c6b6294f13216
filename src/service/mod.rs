pub mod chat;
pub mod classes;
pub mod extraction;
pub mod llm;
pub mod tools;

#[cfg(test)]
pub(crate) mod stub;

pub use chat::{ChatOrchestrator, ChatTurn};
pub use classes::ClassServiceClient;
pub use extraction::{ExtractionJobClient, HttpExtractionBackend};
pub use llm::OpenRouterClient;
pub use tools::ToolRegistry;

use url::Url;

/// Append path segments to a service base URL, percent-encoding each segment
///
/// Identifiers supplied by callers always stay a single segment, so `/`, `?` and
/// `#` inside them cannot change the target route.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
