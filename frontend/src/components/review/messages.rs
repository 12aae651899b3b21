use common::jobs::JobStatus;
use common::model::submission::{Submission, SubmissionStatus};
use common::requests::ApprovalResult;

use crate::components::api::ApiFailure;

pub enum Msg {
    Load,
    Loaded(Vec<Submission>),
    SetFilter(SubmissionStatus),
    Select(Option<String>),
    SetAdmissionNumber(String),
    SetNote(String),
    Approve,
    Approved(ApprovalResult),
    Reject,
    Rejected(Submission),
    ActionFailed(ApiFailure),
    CloseResult,
    StartPromotion,
    PromotionStarted(String),
    PromotionPolled(JobStatus),
}
