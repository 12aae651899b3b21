//! # Public form rendering rules
//!
//! Pure logic behind the public registration form. The frontend component owns the
//! DOM; everything that decides *what* to show lives here so it can be unit tested:
//!
//! - `categorize`: which section (basic, academic, ...) a field belongs to.
//! - `cascade`: the college → course → branch → year → semester selection state and
//!   its reset rules.
//! - `options`: options for reference-bound inputs (branches, years, semesters) and
//!   the input kind of each field.

pub mod cascade;
pub mod categorize;
pub mod options;

pub use cascade::{Selection, Slot};
pub use categorize::{categorize, group_fields};
pub use options::{
    branch_input, field_input_kind, semester_options, year_options, BranchInput, ChoiceOption,
    InputKind, ReferenceData,
};
