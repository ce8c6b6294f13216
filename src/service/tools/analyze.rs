//! Full paper analysis through the extraction backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_args, Tool, ToolError};
use crate::model::ExtractionRequest;
use crate::service::extraction::{ExtractionError, ExtractionJobClient};

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    paper_text: String,
    #[serde(default)]
    extraction_type: Option<String>,
    #[serde(default)]
    custom_prompt: Option<String>,
}

/// Runs the submit-and-poll pipeline on a paper the user pasted into the chat
pub struct AnalyzePaperTool {
    extraction: Arc<ExtractionJobClient>,
}

impl AnalyzePaperTool {
    pub fn new(extraction: Arc<ExtractionJobClient>) -> Self {
        Self { extraction }
    }
}

#[async_trait]
impl Tool for AnalyzePaperTool {
    fn name(&self) -> &str {
        "analyze_paper"
    }

    fn description(&self) -> &str {
        "Run a structured research-paper analysis: methodology, sample size, key statistics, conclusions, notable quotes and reliability scores."
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paper_text": {
                    "type": "string",
                    "description": "Full text of the research paper, at least 100 characters"
                },
                "extraction_type": {
                    "type": "string",
                    "enum": ["all", "numerical", "quotes", "details"],
                    "description": "Which part of the analysis to focus on (default all)"
                },
                "custom_prompt": {
                    "type": "string",
                    "description": "Extra instructions for the analysis"
                }
            },
            "required": ["paper_text"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let args: AnalyzeArgs = parse_args(args)?;
        let request = ExtractionRequest {
            paper_url: None,
            paper_text: Some(args.paper_text),
            extraction_type: args.extraction_type,
            custom_prompt: args.custom_prompt,
        };

        let result = self
            .extraction
            .submit_and_await(&request)
            .await
            .map_err(|e| match e {
                ExtractionError::Validation(v) => ToolError::InvalidArguments(v.to_string()),
                other => ToolError::Execution(other.to_string()),
            })?;

        serde_json::to_value(result).map_err(|e| ToolError::Execution(e.to_string()))
    }
}
