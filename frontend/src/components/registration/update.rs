//! Update function of the registration form.
//!
//! Answers flow through `helpers::apply_value` so the cascade reset rules hold;
//! whenever the course type or academic stage changes the document requirements
//! are re-fetched. `Submit` validates locally first and only then posts.

use common::model::documents::{document_field_name, document_name_from_field, DocumentRequirement};
use common::model::submission::validate_submission;
use common::requests::SubmissionReceipt;
use wasm_bindgen::JsValue;
use web_sys::FormData;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::api::{get_json, post_form, ApiFailure};
use crate::components::notify::{show_toast, Tone};
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::helpers::{apply_value, requirement_key, toggle_option};
use super::messages::Msg;
use super::state::RegistrationForm;

const UPLOAD_DOCUMENTS_PART: &str = "upload_documents";

pub fn update(component: &mut RegistrationForm, ctx: &Context<RegistrationForm>, msg: Msg) -> bool {
    match msg {
        Msg::FormLoaded(form) => {
            component.form = Some(form);
            component.load_error = None;
            true
        }
        Msg::ReferenceLoaded(reference) => {
            component.reference = reference;
            refresh_requirements(component, ctx);
            true
        }
        Msg::LoadFailed(err) => {
            show_toast(&format!("Could not load the form: {}", err), Tone::Error);
            component.load_error = Some(err);
            true
        }
        Msg::SetValue { key, value } => {
            let Some(form) = &component.form else {
                return false;
            };
            apply_value(form, &mut component.selection, &mut component.values, &key, &value);
            clear_error_for(component, &key);
            refresh_requirements(component, ctx);
            true
        }
        Msg::ToggleOption { key, option, checked } => {
            let value = toggle_option(component.values.get(&key).map(String::as_str), &option, checked);
            ctx.link().send_message(Msg::SetValue { key, value });
            false
        }
        Msg::SetFile { part, file } => {
            clear_error_for(component, &part);
            match file {
                Some(file) => {
                    component.files.insert(part, file);
                }
                None => {
                    component.files.remove(&part);
                }
            }
            true
        }
        Msg::RequirementsLoaded { key, documents } => {
            if component.requirement_key.as_ref() != Some(&key) {
                return false;
            }
            let wanted: Vec<String> = documents.iter().map(|d| document_field_name(d)).collect();
            component
                .files
                .retain(|part, _| document_name_from_field(part).is_none() || wanted.contains(part));
            component.required_documents = documents;
            true
        }
        Msg::ToggleDocuments(enabled) => {
            component.upload_documents = enabled;
            true
        }
        Msg::Submit => {
            if component.submitting {
                return false;
            }
            let Some(form) = &component.form else {
                return false;
            };
            if let Err(err) = validate_submission(form, &component.values, &component.file_keys()) {
                show_toast(&err.to_string(), Tone::Error);
                component.error = Some(ApiFailure {
                    message: err.to_string(),
                    field: Some(err.field().to_string()),
                });
                return true;
            }

            let data = match build_form_data(component) {
                Ok(data) => data,
                Err(_) => {
                    show_toast("Could not prepare the upload.", Tone::Error);
                    return false;
                }
            };
            component.submitting = true;
            component.error = None;

            let url = format!("/api/submissions/{}", form.id);
            let link = ctx.link().clone();
            spawn_local(async move {
                match post_form::<SubmissionReceipt>(&url, data).await {
                    Ok(receipt) => link.send_message(Msg::Submitted(receipt)),
                    Err(err) => link.send_message(Msg::SubmitFailed(err)),
                }
            });
            true
        }
        Msg::Submitted(receipt) => {
            component.submitting = false;
            component.receipt = Some(receipt);
            show_toast("Registration submitted.", Tone::Info);
            open_top_sheet(component.receipt_sheet_ref.clone());
            true
        }
        Msg::SubmitFailed(err) => {
            component.submitting = false;
            show_toast(&err.message, Tone::Error);
            component.error = Some(err);
            true
        }
        Msg::Reset => {
            close_top_sheet(component.receipt_sheet_ref.clone());
            component.values.clear();
            component.files.clear();
            component.selection = Default::default();
            component.required_documents.clear();
            component.requirement_key = None;
            component.upload_documents = true;
            component.error = None;
            component.receipt = None;
            true
        }
    }
}

fn clear_error_for(component: &mut RegistrationForm, key: &str) {
    if component.error_for(key).is_some() {
        component.error = None;
    }
}

/// Re-fetches document requirements when the (course type, stage) pair changed.
fn refresh_requirements(component: &mut RegistrationForm, ctx: &Context<RegistrationForm>) {
    let key = requirement_key(&component.reference, &component.selection, &component.values);
    if key == component.requirement_key {
        return;
    }
    component.requirement_key = key.clone();

    let Some((course_type, stage)) = key else {
        component.required_documents.clear();
        component
            .files
            .retain(|part, _| document_name_from_field(part).is_none());
        return;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let query = [
            ("course_type", course_type.as_str()),
            ("academic_stage", stage.as_str()),
        ];
        match get_json::<Vec<DocumentRequirement>>("/api/documents/requirements", &query).await {
            Ok(found) => {
                let documents = found.into_iter().next().map(|r| r.documents).unwrap_or_default();
                link.send_message(Msg::RequirementsLoaded {
                    key: (course_type, stage),
                    documents,
                });
            }
            Err(err) => show_toast(
                &format!("Could not load document requirements: {}", err),
                Tone::Error,
            ),
        }
    });
}

fn build_form_data(component: &RegistrationForm) -> Result<FormData, JsValue> {
    let data = FormData::new()?;
    for (key, value) in &component.values {
        data.append_with_str(key, value)?;
    }
    data.append_with_str(
        UPLOAD_DOCUMENTS_PART,
        if component.upload_documents { "true" } else { "false" },
    )?;
    for (part, file) in &component.files {
        if !component.upload_documents && document_name_from_field(part).is_some() {
            continue;
        }
        data.append_with_blob_and_filename(part, file, &file.name())?;
    }
    Ok(data)
}
