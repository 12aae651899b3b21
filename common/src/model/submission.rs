//! # Submissions
//!
//! A submission is the raw key → value map captured from a public form post, plus
//! references to uploaded files. It is created `pending` and moves once to
//! `approved` or `rejected`.
//!
//! `validate_submission` is shared by the server (authoritative) and the frontend
//! (early feedback). It walks the form in field order and reports the first problem.

use crate::model::documents::CertificatesStatus;
use crate::model::form::{FieldSource, FieldType, Form, FormField};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static TEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("tel regex"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubmissionStatus::Pending),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file stored alongside a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDocument {
    /// Document name (`Aadhaar`, `SSC Memo`, ...) or the key of a `file` field.
    pub name: String,
    pub original_filename: String,
    pub stored_path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    pub data: HashMap<String, String>,
    #[serde(default)]
    pub documents: Vec<SubmissionDocument>,
    pub status: SubmissionStatus,
    pub certificates_status: CertificatesStatus,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub review_note: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub reviewed_at: Option<String>,
}

impl Submission {
    pub fn value(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl SubmissionError {
    pub fn field(&self) -> &str {
        match self {
            SubmissionError::MissingField(field) | SubmissionError::InvalidField { field, .. } => {
                field
            }
        }
    }

    fn invalid(field: &FormField, reason: impl Into<String>) -> Self {
        SubmissionError::InvalidField {
            field: field.key.clone(),
            reason: reason.into(),
        }
    }
}

/// Validates submitted values against the enabled fields of `form`.
///
/// `files` holds the keys of `file`-type fields that received an upload.
pub fn validate_submission(
    form: &Form,
    values: &HashMap<String, String>,
    files: &HashSet<String>,
) -> Result<(), SubmissionError> {
    for field in form.fields.iter().filter(|f| f.is_enabled) {
        if field.field_type == FieldType::File {
            if field.required && !files.contains(&field.key) {
                return Err(SubmissionError::MissingField(field.key.clone()));
            }
            continue;
        }

        let value = values.get(&field.key).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            if field.required {
                return Err(SubmissionError::MissingField(field.key.clone()));
            }
            continue;
        }
        validate_value(field, value)?;
    }
    Ok(())
}

fn validate_value(field: &FormField, value: &str) -> Result<(), SubmissionError> {
    match field.field_type {
        FieldType::Email if !EMAIL_RE.is_match(value) => {
            Err(SubmissionError::invalid(field, "not a valid email address"))
        }
        FieldType::Tel if !TEL_RE.is_match(value) => {
            Err(SubmissionError::invalid(field, "phone number must have 10 digits"))
        }
        FieldType::Number if value.parse::<f64>().is_err() => {
            Err(SubmissionError::invalid(field, "not a number"))
        }
        FieldType::Date if !is_valid_date(value) => {
            Err(SubmissionError::invalid(field, "date must be YYYY-MM-DD"))
        }
        FieldType::Select | FieldType::Radio if field.source == FieldSource::Static => {
            if field.static_options().iter().any(|o| o == value) {
                Ok(())
            } else {
                Err(SubmissionError::invalid(field, format!("'{value}' is not an option")))
            }
        }
        FieldType::Checkbox if field.source == FieldSource::Static => {
            let options = field.static_options();
            match value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .find(|v| !options.iter().any(|o| o == v))
            {
                Some(bad) => Err(SubmissionError::invalid(field, format!("'{bad}' is not an option"))),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

/// `YYYY-MM-DD` naming a real calendar day from 1900 on.
fn is_valid_date(value: &str) -> bool {
    DATE_RE.is_match(value)
        && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok_and(|date| date.year() >= 1900)
}
