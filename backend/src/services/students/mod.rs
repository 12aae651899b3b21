//! # Student Record Store
//!
//! Canonical student records created by approval, under `/api/students`.
//!
//! ## Sub-modules:
//! - `store`: row mapping, lookups, filtered listing and creation from form answers.
//! - `update`: admin edits, soft status changes and self-service mobile verification.
//! - `export`: CSV download of a filtered listing.
//! - `attendance`: per-day attendance marks.

mod attendance;
mod export;
pub(crate) mod store;
mod update;

use crate::db::Database;
use crate::error::ApiResult;
use actix_web::web::{get, post, put, scope};
use actix_web::{web, HttpResponse, Scope};
use common::requests::StudentFilter;

const API_PATH: &str = "/api/students";

/// Registered routes (`/export` before `/{admission_number}`):
///
/// *   **`GET /`** → filtered listing (`status`, `course`, `batch`, `search`).
/// *   **`GET /export`** → `export::process`
/// *   **`GET /{admission_number}`** / **`PUT /{admission_number}`**
/// *   **`PUT /{admission_number}/status`** → `update::process_status`
/// *   **`POST /{admission_number}/verify-mobile`** → `update::process_verify_mobile`
/// *   **`GET|POST /{admission_number}/attendance`**
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list))
        .route("/export", get().to(export::process))
        .route("/{admission_number}", get().to(get_one))
        .route("/{admission_number}", put().to(update::process))
        .route("/{admission_number}/status", put().to(update::process_status))
        .route(
            "/{admission_number}/verify-mobile",
            post().to(update::process_verify_mobile),
        )
        .route("/{admission_number}/attendance", get().to(attendance::list))
        .route("/{admission_number}/attendance", post().to(attendance::mark))
}

async fn list(db: web::Data<Database>, filter: web::Query<StudentFilter>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(store::list_students(&conn, &filter)?))
}

async fn get_one(db: web::Data<Database>, admission_number: web::Path<String>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(store::get_student(&conn, &admission_number)?))
}
