//! Chat turn orchestration
//!
//! A turn is at most two completion calls: the first offers the tool manifest,
//! and if the model asks for tools they run concurrently and their results are
//! sent back for a second, user-facing completion.

pub mod error;
pub mod prompts;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;

use crate::model::{check_tool_sequencing, ChatMessage, SearchConfig, ToolCall};
use crate::service::classes::DocumentSearch;
use crate::service::llm::{ChatGateway, CompletionRequest, CompletionResponse, ToolChoice};
use crate::service::tools::ToolRegistry;

pub use error::ChatError;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1500;

/// One user turn, with the history the caller kept from earlier turns
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub message: String,
    pub history: Vec<ChatMessage>,
    pub class_id: Option<String>,
    pub preferred_tool: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    /// Tools that resolved to a handler, in the order the model requested them
    pub tools_used: Vec<String>,
    pub usage: Option<Value>,
    /// Input history plus every message produced by this turn
    pub history: Vec<ChatMessage>,
}

/// A tool call whose arguments decoded, ready to run
struct PreparedCall<'a> {
    call: &'a ToolCall,
    args: Value,
}

pub struct ChatOrchestrator {
    gateway: Arc<dyn ChatGateway>,
    registry: Arc<ToolRegistry>,
    search: Option<Arc<dyn DocumentSearch>>,
    search_params: SearchConfig,
    model: String,
}

impl ChatOrchestrator {
    pub fn new(gateway: Arc<dyn ChatGateway>, registry: Arc<ToolRegistry>, model: &str) -> Self {
        Self {
            gateway,
            registry,
            search: None,
            search_params: SearchConfig::default(),
            model: model.to_string(),
        }
    }

    /// Enable class context retrieval
    pub fn with_search(mut self, search: Arc<dyn DocumentSearch>, params: SearchConfig) -> Self {
        self.search = Some(search);
        self.search_params = params;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn handle(&self, turn: ChatTurn) -> Result<ChatOutcome, ChatError> {
        check_tool_sequencing(&turn.history)?;

        let system_prompt = self
            .system_prompt(&turn.message, turn.class_id.as_deref(), turn.preferred_tool.as_deref())
            .await;

        let user_message = ChatMessage::user(turn.message);
        let mut history = turn.history;
        history.push(user_message);

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(history.iter().cloned());

        let first = self.complete(messages.clone(), Some(ToolChoice::Auto)).await?;
        let assistant = first
            .first_message()
            .cloned()
            .ok_or(ChatError::EmptyCompletion)?;

        if assistant.requested_tool_calls().is_empty() {
            let response = assistant.text().trim().to_string();
            history.push(assistant);
            return Ok(ChatOutcome {
                response,
                tools_used: Vec::new(),
                usage: first.usage,
                history,
            });
        }

        let prepared = prepare_calls(assistant.requested_tool_calls())?;
        let tools_used: Vec<String> = prepared
            .iter()
            .map(|p| p.call.name())
            .filter(|name| self.registry.contains(name))
            .map(str::to_string)
            .collect();

        tracing::info!(
            tools = ?prepared.iter().map(|p| p.call.name()).collect::<Vec<_>>(),
            "Model requested tool calls"
        );

        let results = self.run_tools(&prepared).await;

        messages.push(assistant.clone());
        messages.extend(results.iter().cloned());
        history.push(assistant);
        history.extend(results);

        let second = self.complete(messages, None).await?;
        let final_message = second
            .first_message()
            .cloned()
            .ok_or(ChatError::EmptyCompletion)?;

        let response = final_message.text().trim().to_string();
        history.push(final_message);

        Ok(ChatOutcome {
            response,
            tools_used,
            usage: second.usage,
            history,
        })
    }

    async fn system_prompt(
        &self,
        query: &str,
        class_id: Option<&str>,
        preferred_tool: Option<&str>,
    ) -> String {
        let class_id = class_id.filter(|id| !id.trim().is_empty());

        let chunks = match (class_id, &self.search) {
            (Some(class_id), Some(search)) => {
                match search.search(class_id, query, &self.search_params).await {
                    Ok(chunks) => {
                        tracing::debug!(
                            class_id = %class_id,
                            chunks = chunks.len(),
                            "Retrieved class context"
                        );
                        chunks
                    }
                    Err(e) => {
                        tracing::warn!(
                            class_id = %class_id,
                            error = %e,
                            "Failed to retrieve document context, continuing without it"
                        );
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        if chunks.is_empty() {
            prompts::personal_assistant_prompt(preferred_tool.filter(|t| !t.trim().is_empty()))
        } else {
            prompts::class_assistant_prompt(&chunks)
        }
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        tool_choice: Option<ToolChoice>,
    ) -> Result<CompletionResponse, ChatError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            tools: self
                .registry
                .definitions()
                .iter()
                .map(|d| d.to_openai_format())
                .collect(),
            tool_choice,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let start_time = std::time::Instant::now();
        let response = self.gateway.complete(&request).await?;

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Completion call finished"
        );

        Ok(response)
    }

    /// Run every call concurrently; results come back in call order
    async fn run_tools(&self, prepared: &[PreparedCall<'_>]) -> Vec<ChatMessage> {
        let futures = prepared.iter().map(|p| async move {
            let name = p.call.name();
            let payload = match self.registry.invoke(name, p.args.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(tool = %name, call_id = %p.call.id, error = %e, "Tool call failed");
                    e.to_payload()
                }
            };
            ChatMessage::tool_result(p.call.id.clone(), name, render_payload(&payload))
        });

        join_all(futures).await
    }
}

/// Decode every call's arguments up front so a malformed call fails the turn before
/// any tool runs
fn prepare_calls(calls: &[ToolCall]) -> Result<Vec<PreparedCall<'_>>, ChatError> {
    calls
        .iter()
        .map(|call| {
            call.parse_arguments()
                .map(|args| PreparedCall { call, args })
                .map_err(|e| ChatError::MalformedToolArguments {
                    tool: call.name().to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn render_payload(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
