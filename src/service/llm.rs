//! LLM gateway client
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol exposed by OpenRouter,
//! including tool calling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ChatMessage, GatewayConfig};

const REFERER: &str = "https://resyft.com";
const TITLE: &str = "Resyft Document Assistant";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Only `auto` is ever sent; the second completion omits the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Body of a completion call
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl CompletionResponse {
    /// Message of the first choice
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|c| &c.message)
    }
}

/// Completion endpoint of an LLM gateway
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, GatewayError>;
}

/// OpenRouter client
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_key: &str, config: &GatewayConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("resyft-assistant/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.clone(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ChatGateway for OpenRouterClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let url = super::endpoint(&self.base_url, &["chat", "completions"])?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to deserialize completion: {}", e)))?;

        tracing::debug!(
            choices = completion.choices.len(),
            finish_reason = ?completion.choices.first().and_then(|c| c.finish_reason.as_deref()),
            "Completion received"
        );

        Ok(completion)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::service::stub::StubServer;

    fn gateway(stub: &StubServer) -> OpenRouterClient {
        OpenRouterClient::new(
            "sk-test",
            &GatewayConfig {
                api_key: Some("sk-test".to_string()),
                model: "anthropic/claude-3-haiku".to_string(),
                base_url: format!("{}/api/v1", stub.url),
            },
        )
    }

    fn tool_turn_request() -> CompletionRequest {
        CompletionRequest {
            model: "anthropic/claude-3-haiku".to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("summarize")],
            tools: vec![json!({"type": "function", "function": {"name": "summarize_document"}})],
            tool_choice: Some(ToolChoice::Auto),
            temperature: 0.7,
            max_tokens: 1500,
        }
    }

    #[actix_web::test]
    async fn test_completion_request_on_the_wire() {
        let stub = StubServer::start(
            200,
            json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Short summary."},
                    "finish_reason": "stop"
                }],
                "usage": {"total_tokens": 12}
            }),
        );

        let response = gateway(&stub).complete(&tool_turn_request()).await.unwrap();

        assert_eq!(response.first_message().map(|m| m.text()), Some("Short summary."));

        let request = stub.single_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/v1/chat/completions");
        assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
        assert_eq!(request.header("http-referer"), Some("https://resyft.com"));
        assert_eq!(request.header("x-title"), Some("Resyft Document Assistant"));
        assert_eq!(request.header("user-agent"), Some("resyft-assistant/1.0"));

        let body = request.json();
        assert_eq!(body["model"], "anthropic/claude-3-haiku");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "summarize");
        assert_eq!(body["tools"][0]["function"]["name"], "summarize_document");
    }

    #[actix_web::test]
    async fn test_non_success_status_keeps_body() {
        let stub = StubServer::start(401, json!("No auth credentials found"));

        let err = gateway(&stub).complete(&tool_turn_request()).await.unwrap_err();

        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "No auth credentials found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[actix_web::test]
    async fn test_unparseable_completion_is_parse_error() {
        let stub = StubServer::start(200, json!({"choices": "none"}));

        let err = gateway(&stub).complete(&tool_turn_request()).await.unwrap_err();

        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn test_request_omits_unset_tool_choice() {
        let request = CompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            tools: vec![],
            tool_choice: None,
            temperature: 0.7,
            max_tokens: 1500,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("tools").is_none());
        assert_eq!(value["max_tokens"], 1500);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_request_serializes_auto_tool_choice() {
        let request = CompletionRequest {
            model: "m".to_string(),
            messages: vec![],
            tools: vec![serde_json::json!({"type": "function"})],
            tool_choice: Some(ToolChoice::Auto),
            temperature: 0.7,
            max_tokens: 1500,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["tools"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_response_parses_openrouter_shape() {
        let raw = r#"{
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{"id": "t1", "type": "function",
                        "function": {"name": "extract_statistics", "arguments": "{}"}}]
                }
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let response: CompletionResponse = serde_json::from_str(raw).unwrap();
        let message = response.first_message().unwrap();
        assert_eq!(message.requested_tool_calls().len(), 1);
        assert_eq!(response.usage.unwrap()["total_tokens"], 15);
    }
}
