//! # Form Schema Service
//!
//! Admin-defined registration forms and their public view, under `/api/forms`.
//!
//! ## Sub-modules:
//! - `create`: validates and stores a new form definition.
//! - `update`: replaces the definition of an existing form.
//! - `get`: loads a form by id; shared with the submission handler.
//! - `list`: admin listing with pending-submission counts.
//! - `public`: the public view of an active form.

pub(crate) mod create;
pub(crate) mod get;
mod list;
pub(crate) mod public;
mod update;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/forms";

/// Registered routes:
///
/// *   **`GET /`** → `list::process`
/// *   **`POST /`** → `create::process`: body `FormSpec`, returns the stored `Form` (201).
/// *   **`GET /public/{form_id}`** → `public::process`: 404 unless the form is active.
/// *   **`GET /{form_id}`** → `get::process`
/// *   **`PUT /{form_id}`** → `update::process`: body `FormSpec`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/public/{form_id}", get().to(public::process))
        .route("/{form_id}", get().to(get::process))
        .route("/{form_id}", put().to(update::process))
}
