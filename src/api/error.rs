//! Unified API error handling
//!
//! Every endpoint reports failures as `{error, details?, suggestion?, request_id}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::chat::ChatError;
use crate::service::classes::ClassServiceError;
use crate::service::extraction::ValidationError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error summary
    pub error: String,
    /// Underlying cause, when one is worth showing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Next step offered to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Paper analysis input rejected (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Conversation history breaks tool message sequencing (400)
    #[error("{0}")]
    InvalidHistory(String),

    /// Chat turn failed (500)
    #[error("{0}")]
    ChatFailed(String),

    /// Class listing failed upstream (500)
    #[error("{0}")]
    ClassListFailed(String),

    /// Class creation failed upstream (500)
    #[error("{0}")]
    ClassCreateFailed(String),
}

impl ApiError {
    fn summary(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::InvalidHistory(_) => "Invalid conversation history".to_string(),
            ApiError::ChatFailed(_) => "Failed to generate response".to_string(),
            ApiError::ClassListFailed(_) => "Failed to fetch classes".to_string(),
            ApiError::ClassCreateFailed(_) => "Failed to create class".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => None,
            ApiError::InvalidHistory(d)
            | ApiError::ChatFailed(d)
            | ApiError::ClassListFailed(d)
            | ApiError::ClassCreateFailed(d) => Some(d.clone()),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ApiError::Validation(e) => e.suggestion().map(str::to_string),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::InvalidHistory(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ChatFailed(_)
            | ApiError::ClassListFailed(_)
            | ApiError::ClassCreateFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::InvalidHistory(_) => "invalid_history",
            ApiError::ChatFailed(_) => "chat_error",
            ApiError::ClassListFailed(_) | ApiError::ClassCreateFailed(_) => "class_service_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: self.summary(),
            details: self.details(),
            suggestion: self.suggestion(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidHistory(e) => ApiError::InvalidHistory(e.to_string()),
            other => ApiError::ChatFailed(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn class_list(err: ClassServiceError) -> Self {
        ApiError::ClassListFailed(err.to_string())
    }

    pub fn class_create(err: ClassServiceError) -> Self {
        ApiError::ClassCreateFailed(err.to_string())
    }
}
