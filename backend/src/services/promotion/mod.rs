//! # Promotion Service
//!
//! Moves `Regular` students to their next semester as a background job.
//!
//! *   **`POST /api/promotion/start`** → `start::process`: body `StartPromotionRequest`,
//!     returns `{ "job_id" }` immediately.
//! *   **`GET /api/promotion/status/{job_id}`** → `status::process`: the `JobStatus`.

mod start;
mod status;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/promotion";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start::process))
        .route("/status/{job_id}", get().to(status::process))
}
