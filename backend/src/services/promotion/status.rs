use crate::error::{ApiError, ApiResult};
use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse};

/// `GET /api/promotion/status/{job_id}`
pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> ApiResult<HttpResponse> {
    match state.status(&job_id).await {
        Some(status) => Ok(HttpResponse::Ok().json(status)),
        None => Err(ApiError::NotFound(format!("job {} not found", job_id.as_str()))),
    }
}
