//! Class management proxy to the AI service

use actix_web::{HttpResponse, get, post, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{ClassCreatedResponse, ClassListResponse, CreateClassRequest};
use crate::service::classes::DEFAULT_USER_ID;
use crate::service::ClassServiceClient;

/// List the classes of the current user
#[utoipa::path(
    get,
    path = "/classes",
    responses(
        (status = 200, description = "Classes retrieved successfully", body = ClassListResponse),
        (status = 500, description = "AI service failure", body = ErrorResponse)
    ),
    tag = "classes"
)]
#[get("/classes")]
pub async fn list_classes(
    service: web::Data<ClassServiceClient>,
) -> Result<HttpResponse, ApiError> {
    let classes = service
        .list_classes(DEFAULT_USER_ID)
        .await
        .map_err(ApiError::class_list)?;

    Ok(HttpResponse::Ok().json(classes))
}

/// Create a class for the current user
#[utoipa::path(
    post,
    path = "/classes",
    request_body = CreateClassRequest,
    responses(
        (status = 200, description = "Class created", body = ClassCreatedResponse),
        (status = 400, description = "Name or course code missing", body = ErrorResponse),
        (status = 500, description = "AI service failure", body = ErrorResponse)
    ),
    tag = "classes"
)]
#[post("/classes")]
pub async fn create_class(
    service: web::Data<ClassServiceClient>,
    body: web::Json<CreateClassRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_class = body
        .into_inner()
        .into_new_class(DEFAULT_USER_ID)
        .ok_or_else(|| ApiError::BadRequest("Name and course_code are required".to_string()))?;

    let class = service
        .create_class(&new_class)
        .await
        .map_err(ApiError::class_create)?;

    Ok(HttpResponse::Ok().json(ClassCreatedResponse { class }))
}

/// Configure class routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_classes).service(create_class);
}
