//! # Submission Service
//!
//! Public intake of filled forms and the admin review queue, under `/api/submissions`.
//!
//! ## Workflow:
//!
//! 1.  **Intake**: `submit::process` streams the multipart body, storing uploads under
//!     the configured upload directory, validates the answers against the form and
//!     stores one `pending` submission with its documents.
//! 2.  **Review**: `get` lists and loads submissions; `review` approves (creating the
//!     student and login credentials) or rejects them.
//!
//! ## Sub-modules:
//! - `submit`: multipart intake.
//! - `get`: listing and detail.
//! - `review`: approve and reject.
//! - `credentials`: derived initial password and its Argon2 hash.

pub(crate) mod credentials;
pub(crate) mod get;
mod review;
pub(crate) mod submit;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/submissions";

/// Registered routes:
///
/// *   **`POST /{form_id}`** → `submit::process` (multipart/form-data)
/// *   **`GET /?status=`** → `get::process_list`
/// *   **`GET /item/{id}`** → `get::process`
/// *   **`POST /item/{id}/approve`** → `review::approve`: body `ApprovalRequest`.
/// *   **`POST /item/{id}/reject`** → `review::reject`: body `RejectRequest`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process_list))
        .route("/item/{id}", get().to(get::process))
        .route("/item/{id}/approve", post().to(review::approve))
        .route("/item/{id}/reject", post().to(review::reject))
        .route("/{form_id}", post().to(submit::process))
}
