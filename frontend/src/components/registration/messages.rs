use common::model::form::Form;
use common::render::ReferenceData;
use common::requests::SubmissionReceipt;

use crate::components::api::ApiFailure;

pub enum Msg {
    FormLoaded(Form),
    ReferenceLoaded(ReferenceData),
    LoadFailed(ApiFailure),
    SetValue { key: String, value: String },
    ToggleOption { key: String, option: String, checked: bool },
    /// `part` is a `file` field key or a `document_<Name>` part name.
    SetFile { part: String, file: Option<web_sys::File> },
    RequirementsLoaded { key: (String, String), documents: Vec<String> },
    ToggleDocuments(bool),
    Submit,
    Submitted(SubmissionReceipt),
    SubmitFailed(ApiFailure),
    Reset,
}
