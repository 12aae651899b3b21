//! Types and pure logic shared by the registrar backend and the portal frontend.
//!
//! - `model`: wire/persistence models (forms, submissions, students, reference data).
//! - `render`: client-side rendering rules for public forms (categorization,
//!   cascading selections, option derivation).
//! - `requests`: request/response payloads for the REST API.
//! - `jobs`: status of background jobs polled by the admin screen.

pub mod jobs;
pub mod model;
pub mod render;
pub mod requests;
