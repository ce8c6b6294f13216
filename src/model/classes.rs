use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Request body of `POST /classes`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
}

const DEFAULT_SEMESTER: &str = "Current";
const DEFAULT_INSTRUCTOR: &str = "TBD";

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateClassRequest {
    /// Build the upstream body, or `None` when name or course code is missing
    pub fn into_new_class(self, user_id: &str) -> Option<NewClass> {
        Some(NewClass {
            user_id: user_id.to_string(),
            name: non_blank(self.name)?,
            course_code: non_blank(self.course_code)?,
            semester: non_blank(self.semester).unwrap_or_else(|| DEFAULT_SEMESTER.to_string()),
            instructor: non_blank(self.instructor)
                .unwrap_or_else(|| DEFAULT_INSTRUCTOR.to_string()),
        })
    }
}

/// Body forwarded to the AI service when creating a class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewClass {
    pub user_id: String,
    pub name: String,
    pub course_code: String,
    pub semester: String,
    pub instructor: String,
}

/// AI service reply to a class creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedClass {
    pub class_id: String,
    pub name: String,
    pub course_code: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub course_code: String,
    pub semester: Option<String>,
    pub instructor: Option<String>,
    pub color_theme: String,
    pub document_count: u32,
    pub last_activity: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassCreatedResponse {
    pub class: ClassSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassListResponse {
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub classes: Vec<Value>,
}

/// Chunk returned by the class document search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContextChunk {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<ChunkMetadata>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub filename: Option<String>,
}

impl ContextChunk {
    pub fn filename(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.filename.as_deref())
            .unwrap_or("Unknown")
    }
}
