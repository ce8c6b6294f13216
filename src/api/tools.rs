//! Tool manifest endpoint

use actix_web::{HttpResponse, Responder, get, web};

use crate::model::ToolDefinition;
use crate::service::ChatOrchestrator;

/// List the tools the assistant can call
#[utoipa::path(
    get,
    path = "/tools",
    responses(
        (status = 200, description = "Registered tool definitions", body = Vec<ToolDefinition>)
    ),
    tag = "chat"
)]
#[get("/tools")]
pub async fn list_tools(orchestrator: web::Data<ChatOrchestrator>) -> impl Responder {
    HttpResponse::Ok().json(orchestrator.registry().definitions())
}

/// Configure tool routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tools);
}
