//! Chat endpoint driving the document assistant

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::ChatMessage;
use crate::service::{ChatOrchestrator, ChatTurn};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// History returned by the previous turn
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    /// Tool the user asked the assistant to favour
    #[serde(default)]
    pub preferred_tool: Option<String>,
    /// Class whose documents ground the answer
    #[serde(default)]
    pub class_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub tools_used: Vec<String>,
    /// Token usage as reported by the gateway
    #[schema(value_type = Object)]
    pub usage: Option<Value>,
    pub conversation_history: Vec<ChatMessage>,
}

/// Run one assistant turn
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Missing message or invalid conversation history", body = ErrorResponse),
        (status = 500, description = "Gateway or tool argument failure", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[post("/chat")]
pub async fn chat(
    orchestrator: web::Data<ChatOrchestrator>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    tracing::debug!(
        history = request.conversation_history.len(),
        class_id = ?request.class_id,
        preferred_tool = ?request.preferred_tool,
        "Chat turn received"
    );

    let outcome = orchestrator
        .handle(ChatTurn {
            message: request.message,
            history: request.conversation_history,
            class_id: request.class_id,
            preferred_tool: request.preferred_tool,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ChatResponse {
        response: outcome.response,
        tools_used: outcome.tools_used,
        usage: outcome.usage,
        conversation_history: outcome.history,
    }))
}

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat);
}
