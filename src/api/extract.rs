//! Paper analysis endpoint

use actix_web::{HttpResponse, post, web};

use crate::api::error::{ApiError, ErrorResponse};
use crate::model::{ExtractionRequest, NormalizedAnalysisResult};
use crate::service::ExtractionJobClient;

/// Analyze a research paper
///
/// Pipeline failures after validation still answer 200, with placeholder fields
/// and the cause in `error`, so the result panel always renders.
#[utoipa::path(
    post,
    path = "/extract",
    request_body = ExtractionRequest,
    responses(
        (status = 200, description = "Normalized analysis, possibly degraded", body = NormalizedAnalysisResult),
        (status = 400, description = "Missing, URL-only, or too short input", body = ErrorResponse)
    ),
    tag = "extraction"
)]
#[post("/extract")]
pub async fn extract(
    client: web::Data<ExtractionJobClient>,
    body: web::Json<ExtractionRequest>,
) -> Result<HttpResponse, ApiError> {
    let result = client.analyze(&body).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Configure extraction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(extract);
}
