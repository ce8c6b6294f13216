use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Paper analysis request accepted by `POST /extract`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub paper_url: Option<String>,
    #[serde(default)]
    pub paper_text: Option<String>,
    /// numerical, quotes, details or all (default)
    #[serde(default)]
    pub extraction_type: Option<String>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// Job creation body sent to the extraction backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSubmission {
    pub paper_url: String,
    pub paper_text: String,
    pub extraction_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Job creation reply from the extraction backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "jobId", default)]
    pub job_id: Option<String>,
}

/// Backend-side job lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[serde(alias = "waiting", alias = "delayed")]
    Queued,
    #[serde(alias = "active")]
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Reply of the job status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    /// Percentage as reported by the backend; some queues report objects here
    #[serde(default)]
    pub progress: Option<Value>,
    #[serde(default)]
    pub result: Option<BackendAnalysis>,
    #[serde(rename = "failedReason", default)]
    pub failed_reason: Option<String>,
}

/// Raw analysis payload of a completed job
///
/// Every field may be missing or carry an unexpected JSON type. Coercion into the
/// result shape happens during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendAnalysis {
    #[serde(default)]
    pub methods: Option<Value>,
    #[serde(default)]
    pub sample_size: Option<Value>,
    #[serde(default)]
    pub key_statistics: Option<Value>,
    #[serde(default)]
    pub numerical_data: Option<Value>,
    #[serde(default)]
    pub conclusions: Option<Value>,
    #[serde(default)]
    pub important_quotes: Option<Value>,
    #[serde(default)]
    pub reliability_score: Option<Value>,
    #[serde(default)]
    pub relevance_score: Option<Value>,
    #[serde(default)]
    pub suggested_text: Option<Value>,
}

/// Fixed-shape analysis result returned to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedAnalysisResult {
    pub methods: String,
    #[schema(value_type = Option<Object>)]
    pub sample_size: Option<Value>,
    #[schema(value_type = Object)]
    pub key_statistics: Value,
    pub conclusions: String,
    pub important_quotes: Vec<String>,
    /// Always within [0, 1]
    pub reliability_score: f64,
    /// Always within [0, 1]
    pub relevance_score: f64,
    pub suggested_text: String,
    /// Present only on degraded results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "_full_result")]
    pub full_result: FullResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FullResult {
    pub suggested_text: Option<String>,
}
