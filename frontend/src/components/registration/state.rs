//! Runtime state of the public registration form.

use std::collections::{HashMap, HashSet};

use common::model::form::Form;
use common::render::{ReferenceData, Selection};
use common::requests::SubmissionReceipt;
use web_sys::File;
use yew::prelude::*;

use crate::components::api::ApiFailure;

pub struct RegistrationForm {
    /// Public view of the form; `None` until loaded.
    pub form: Option<Form>,

    /// Colleges, courses and academic years the dropdowns resolve against.
    pub reference: ReferenceData,

    /// Answers keyed by field key. Checkbox answers are comma separated.
    pub values: HashMap<String, String>,

    /// College → course → branch → batch → year → semester cascade.
    pub selection: Selection,

    /// Picked files keyed by multipart part name.
    pub files: HashMap<String, File>,

    /// Documents required for the current course type and academic stage.
    pub required_documents: Vec<String>,

    /// `(course_type, academic_stage)` that `required_documents` belongs to.
    pub requirement_key: Option<(String, String)>,

    /// Whether document files are sent now or brought in later.
    pub upload_documents: bool,

    /// Last validation or server error, shown next to its field.
    pub error: Option<ApiFailure>,

    pub load_error: Option<ApiFailure>,
    pub submitting: bool,
    pub receipt: Option<SubmissionReceipt>,
    pub receipt_sheet_ref: NodeRef,
    pub loaded: bool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            form: None,
            reference: ReferenceData::default(),
            values: HashMap::new(),
            selection: Selection::default(),
            files: HashMap::new(),
            required_documents: Vec::new(),
            requirement_key: None,
            upload_documents: true,
            error: None,
            load_error: None,
            submitting: false,
            receipt: None,
            receipt_sheet_ref: NodeRef::default(),
            loaded: false,
        }
    }

    /// Part names that currently hold a file.
    pub fn file_keys(&self) -> HashSet<String> {
        self.files.keys().cloned().collect()
    }

    /// Error message for `key`, if the last error named it.
    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.field.as_deref() == Some(key))
            .map(|e| e.message.as_str())
    }
}
