//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::{chat, classes, error, extract, health, tools};
use crate::model;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resyft Document Assistant",
        description = "Chat tool-calling loop and research paper extraction"
    ),
    paths(
        chat::chat,
        extract::extract,
        classes::list_classes,
        classes::create_class,
        tools::list_tools,
        health::liveness,
    ),
    components(schemas(
        chat::ChatRequest,
        chat::ChatResponse,
        error::ErrorResponse,
        health::HealthStatus,
        model::ChatMessage,
        model::Role,
        model::ToolCall,
        model::FunctionCall,
        model::ToolDefinition,
        model::ExtractionRequest,
        model::NormalizedAnalysisResult,
        model::FullResult,
        model::CreateClassRequest,
        model::ClassSummary,
        model::ClassCreatedResponse,
        model::ClassListResponse,
    )),
    tags(
        (name = "chat", description = "Document assistant"),
        (name = "extraction", description = "Research paper analysis"),
        (name = "classes", description = "Class management"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
