//! Runtime state of the admin review screen.

use common::jobs::JobStatus;
use common::model::submission::{Submission, SubmissionStatus};
use common::requests::ApprovalResult;
use yew::prelude::*;

pub struct ReviewComponent {
    /// Status the listing is filtered by.
    pub filter: SubmissionStatus,
    pub submissions: Vec<Submission>,
    pub loading: bool,

    /// Id of the submission open in the detail panel.
    pub selected: Option<String>,

    /// Admission number to approve with; prefilled from the submitted answers.
    pub admission_number: String,
    pub note: String,

    /// An approve or reject call is in flight.
    pub busy: bool,

    /// Credentials of the last approval, shown once in the result sheet.
    pub approval: Option<ApprovalResult>,
    pub result_sheet_ref: NodeRef,

    /// Running or last promotion job and its latest status.
    pub promotion: Option<(String, JobStatus)>,
    pub loaded: bool,
}

impl ReviewComponent {
    pub fn new() -> Self {
        Self {
            filter: SubmissionStatus::Pending,
            submissions: Vec::new(),
            loading: false,
            selected: None,
            admission_number: String::new(),
            note: String::new(),
            busy: false,
            approval: None,
            result_sheet_ref: NodeRef::default(),
            promotion: None,
            loaded: false,
        }
    }

    pub fn selected_submission(&self) -> Option<&Submission> {
        let id = self.selected.as_deref()?;
        self.submissions.iter().find(|s| s.id == id)
    }
}
