//! Request and response payloads of the REST API that are not plain models.

use crate::model::attendance::AttendanceStatus;
use crate::model::documents::CertificatesStatus;
use crate::model::reference::YearSemesters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub field: Option<String>,
}

/// Response of `POST /api/submissions/{form_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub certificates_status: CertificatesStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Admission number assigned by the reviewer; falls back to the submitted value.
    #[serde(default)]
    pub admission_number: Option<String>,
    /// Reviewer corrections applied over the submitted answers, keyed by form key.
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

/// Returned once on approval; the plain password is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalResult {
    pub student_id: i64,
    pub admission_number: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    /// Matches name, admission number or mobile.
    #[serde(default)]
    pub search: Option<String>,
}

/// Admin edit of a student; only provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub student_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub student_mobile: Option<String>,
    pub parent_mobile1: Option<String>,
    pub parent_mobile2: Option<String>,
    pub email: Option<String>,
    pub student_address: Option<String>,
    pub city_village: Option<String>,
    pub mandal_name: Option<String>,
    pub district: Option<String>,
    pub college: Option<String>,
    pub course: Option<String>,
    pub branch: Option<String>,
    pub batch: Option<String>,
    pub current_year: Option<u8>,
    pub current_semester: Option<u8>,
    pub fee_status: Option<String>,
    pub registration_status: Option<String>,
    pub scholar_status: Option<String>,
    pub certificates_status: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub student_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileVerification {
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceMark {
    /// `YYYY-MM-DD`
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCollege {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub college_id: Option<i64>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub total_years: u8,
    #[serde(default)]
    pub semesters_per_year: u8,
    #[serde(default)]
    pub year_semester_config: Option<Vec<YearSemesters>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAcademicYear {
    /// `2024-2025`
    pub year_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementQuery {
    #[serde(default)]
    pub course_type: Option<String>,
    #[serde(default)]
    pub academic_stage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartPromotionRequest {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStarted {
    pub job_id: String,
}
