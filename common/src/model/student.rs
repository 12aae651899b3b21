use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle values of `students.student_status`. Students are never deleted;
/// these soft states describe where they are.
pub mod status {
    pub const REGULAR: &str = "Regular";
    pub const DISCONTINUED: &str = "Discontinued";
    pub const ADMISSION_CANCELLED: &str = "Admission Cancelled";
    pub const COMPLETED: &str = "Completed";
    pub const DETAINED: &str = "Detained";

    pub const ALL: [&str; 5] = [REGULAR, DISCONTINUED, ADMISSION_CANCELLED, COMPLETED, DETAINED];

    pub fn is_known(value: &str) -> bool {
        ALL.contains(&value)
    }
}

/// Canonical student record, keyed by `admission_number`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub admission_number: String,
    pub student_name: String,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub adhar_no: Option<String>,
    pub caste: Option<String>,
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
    pub student_status: String,
    pub mobile_verified: bool,
    pub student_photo: Option<String>,
    pub remarks: Option<String>,
    /// Form answers without a dedicated column.
    #[serde(default)]
    pub extra: HashMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}
