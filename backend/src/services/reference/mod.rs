//! # Reference Data Service
//!
//! Colleges, courses (with branches) and academic years. The public endpoints feed
//! the registration form dropdowns; the admin endpoints maintain the tables.
//!
//! ## Sub-modules:
//! - `colleges`: `/api/colleges`
//! - `courses`: `/api/courses`, including branches
//! - `academic_years`: `/api/academic-years`

pub(crate) mod academic_years;
pub(crate) mod colleges;
pub(crate) mod courses;
