//! Document requirements and the derived `certificates_status` of a submission.
//!
//! Requirements are configured per (course type, academic stage). Uploaded documents
//! arrive as multipart parts named `document_<Name>`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Multipart part prefix for uploaded documents.
pub const DOCUMENT_FIELD_PREFIX: &str = "document_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificatesStatus {
    Submitted,
    Pending,
}

impl CertificatesStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CertificatesStatus::Submitted => "Submitted",
            CertificatesStatus::Pending => "Pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Submitted" => Some(CertificatesStatus::Submitted),
            "Pending" => Some(CertificatesStatus::Pending),
            _ => None,
        }
    }
}

/// Documents currently required for one (course type, academic stage) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequirement {
    pub course_type: String,
    pub academic_stage: String,
    pub documents: Vec<String>,
}

/// Multipart part name for a document, e.g. `document_Aadhaar`.
pub fn document_field_name(document: &str) -> String {
    format!("{DOCUMENT_FIELD_PREFIX}{document}")
}

/// Inverse of `document_field_name`; `None` for parts that are not documents.
pub fn document_name_from_field(part_name: &str) -> Option<&str> {
    part_name
        .strip_prefix(DOCUMENT_FIELD_PREFIX)
        .filter(|name| !name.trim().is_empty())
}

/// `Submitted` when every required document was attached, otherwise `Pending`.
///
/// Names compare case-insensitively; an empty requirement list is satisfied.
pub fn certificates_status(required: &[String], attached: &HashSet<String>) -> CertificatesStatus {
    let attached: HashSet<String> = attached.iter().map(|a| a.trim().to_lowercase()).collect();
    if required
        .iter()
        .all(|doc| attached.contains(&doc.trim().to_lowercase()))
    {
        CertificatesStatus::Submitted
    } else {
        CertificatesStatus::Pending
    }
}
