//! Error types for the chat turn

use thiserror::Error;

use crate::model::SequencingError;
use crate::service::llm::GatewayError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Completion returned no message")]
    EmptyCompletion,

    #[error("Malformed arguments for tool '{tool}': {reason}")]
    MalformedToolArguments { tool: String, reason: String },

    #[error("Invalid conversation history: {0}")]
    InvalidHistory(#[from] SequencingError),
}
