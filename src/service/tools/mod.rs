//! Tool registry for the chat tool-invocation loop
//!
//! Each tool advertises its own definition, so the manifest sent to the model
//! and the set of handlers cannot drift apart. The registry rejects duplicate
//! names at construction time.

mod analyze;
mod quotes;
mod statistics;
mod summarize;
mod text;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::ToolDefinition;
use crate::service::extraction::ExtractionJobClient;

pub use analyze::AnalyzePaperTool;
pub use quotes::KeyQuotesTool;
pub use statistics::StatisticsTool;
pub use summarize::SummarizeTool;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    /// Payload fed back to the model in place of a result
    pub fn to_payload(&self) -> Value {
        let error = match self {
            ToolError::UnknownTool(_) => "Unknown tool",
            ToolError::InvalidArguments(_) | ToolError::Execution(_) => "Tool execution failed",
        };
        serde_json::json!({
            "error": error,
            "details": self.to_string(),
        })
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("Tool registered with an empty name")]
    EmptyName,
}

/// A capability the model can invoke by name
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the argument object
    fn parameters(&self) -> Value;

    /// Run the tool; argument validation is the tool's own job
    async fn invoke(&self, args: Value) -> Result<Value, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

pub type BoxedTool = Arc<dyn Tool>;

/// Decode tool arguments into the tool's typed argument struct
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Static name-to-handler mapping, built once at startup
pub struct ToolRegistry {
    tools: Vec<BoxedTool>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new(tools: Vec<BoxedTool>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());

        for (position, tool) in tools.iter().enumerate() {
            let name = tool.name();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(name.to_string(), position).is_some() {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
        }

        tracing::debug!(tools = tools.len(), "Tool registry built");

        Ok(Self { tools, index })
    }

    /// Registry holding the built-in document tools
    pub fn with_builtin_tools(
        extraction: Arc<ExtractionJobClient>,
    ) -> Result<Self, RegistryError> {
        Self::new(vec![
            Arc::new(SummarizeTool),
            Arc::new(KeyQuotesTool::new()),
            Arc::new(StatisticsTool::new()),
            Arc::new(AnalyzePaperTool::new(extraction)),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Manifest advertised to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.invoke(args).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Tool returning its arguments under `echo`
    pub struct EchoTool(pub &'static str);

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Echo the arguments back"
        }

        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }

        async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
            Ok(serde_json::json!({ "echo": args }))
        }
    }

    /// Tool that always fails
    pub struct FailingTool(pub &'static str);

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn parameters(&self) -> Value {
            serde_json::json!({"type": "object"})
        }

        async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
            Err(ToolError::Execution("disk on fire".to_string()))
        }
    }
}
