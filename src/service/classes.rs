//! AI service client for class management and class document search

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    ClassListResponse, ClassSummary, ContextChunk, CreatedClass, NewClass, SearchConfig,
};

/// Single demo account until authentication is wired in
pub const DEFAULT_USER_ID: &str = "demo-user-123";

const COLOR_THEMES: &[&str] = &[
    "#3B82F6", // Blue
    "#10B981", // Emerald
    "#8B5CF6", // Purple
    "#F59E0B", // Amber
    "#EF4444", // Red
    "#06B6D4", // Cyan
    "#84CC16", // Lime
    "#F97316", // Orange
];

#[derive(Debug, thiserror::Error)]
pub enum ClassServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service error: {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid AI service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" - {}", d))
        .unwrap_or_default()
}

/// Similarity search over the documents uploaded to a class
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    async fn search(
        &self,
        class_id: &str,
        query: &str,
        params: &SearchConfig,
    ) -> Result<Vec<ContextChunk>, ClassServiceError>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: u32,
    similarity_threshold: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    chunks: Vec<ContextChunk>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: Option<String>,
}

/// Client for the AI service hosting classes and their document index
pub struct ClassServiceClient {
    client: Client,
    base_url: String,
}

impl ClassServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// List the classes of a user
    pub async fn list_classes(&self, user_id: &str) -> Result<ClassListResponse, ClassServiceError> {
        let url = super::endpoint(&self.base_url, &["classes"])?;

        let response = self
            .client
            .get(url)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassServiceError::Status {
                status: response.status().as_u16(),
                detail: None,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClassServiceError::Parse(e.to_string()))?;

        let classes = data
            .get("classes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        tracing::debug!(user_id = %user_id, count = classes.len(), "Listed classes");

        Ok(ClassListResponse { classes })
    }

    /// Create a class and project it into the UI summary shape
    pub async fn create_class(&self, class: &NewClass) -> Result<ClassSummary, ClassServiceError> {
        let url = super::endpoint(&self.base_url, &["classes"])?;

        let response = self.client.post(url).json(class).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response
                .json::<ServiceErrorBody>()
                .await
                .ok()
                .and_then(|b| b.detail);
            return Err(ClassServiceError::Status { status, detail });
        }

        let created: CreatedClass = response
            .json()
            .await
            .map_err(|e| ClassServiceError::Parse(e.to_string()))?;

        tracing::info!(class_id = %created.class_id, name = %created.name, "Class created");

        Ok(summarize_created(created))
    }
}

#[async_trait]
impl DocumentSearch for ClassServiceClient {
    async fn search(
        &self,
        class_id: &str,
        query: &str,
        params: &SearchConfig,
    ) -> Result<Vec<ContextChunk>, ClassServiceError> {
        let url = super::endpoint(&self.base_url, &["classes", class_id, "search"])?;

        let response = self
            .client
            .post(url)
            .json(&SearchRequest {
                query,
                limit: params.limit,
                similarity_threshold: params.similarity_threshold,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassServiceError::Status {
                status: response.status().as_u16(),
                detail: None,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClassServiceError::Parse(e.to_string()))?;

        Ok(body.chunks)
    }
}

fn summarize_created(created: CreatedClass) -> ClassSummary {
    ClassSummary {
        id: created.class_id,
        name: created.name,
        course_code: created.course_code,
        semester: created.semester,
        instructor: created.instructor,
        color_theme: random_color_theme().to_string(),
        document_count: 0,
        last_activity: "Just created".to_string(),
    }
}

fn random_color_theme() -> &'static str {
    COLOR_THEMES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(COLOR_THEMES[0])
}
