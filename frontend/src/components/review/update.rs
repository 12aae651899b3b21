//! Update function of the review screen.

use common::jobs::JobStatus;
use common::model::submission::Submission;
use common::requests::{ApprovalRequest, ApprovalResult, JobStarted, RejectRequest, StartPromotionRequest};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::api::{get_json, post_json};
use crate::components::notify::{show_toast, Tone};
use crate::tops_sheet::yw_material_top_sheet::{close_top_sheet, open_top_sheet};

use super::helpers::is_finished;
use super::messages::Msg;
use super::state::ReviewComponent;

const SUBMISSIONS_URL: &str = "/api/submissions";

pub fn update(component: &mut ReviewComponent, ctx: &Context<ReviewComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Load => {
            component.loading = true;
            let status = component.filter.as_str();
            let link = ctx.link().clone();
            spawn_local(async move {
                match get_json::<Vec<Submission>>(SUBMISSIONS_URL, &[("status", status)]).await {
                    Ok(submissions) => link.send_message(Msg::Loaded(submissions)),
                    Err(err) => link.send_message(Msg::ActionFailed(err)),
                }
            });
            true
        }
        Msg::Loaded(submissions) => {
            component.loading = false;
            component.submissions = submissions;
            if component.selected_submission().is_none() {
                component.selected = None;
            }
            true
        }
        Msg::SetFilter(status) => {
            if component.filter == status {
                return false;
            }
            component.filter = status;
            component.selected = None;
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::Select(id) => {
            component.selected = id;
            component.note.clear();
            component.admission_number = component
                .selected_submission()
                .and_then(|s| s.value("admission_number"))
                .unwrap_or_default()
                .to_string();
            true
        }
        Msg::SetAdmissionNumber(value) => {
            component.admission_number = value;
            false
        }
        Msg::SetNote(value) => {
            component.note = value;
            false
        }
        Msg::Approve => {
            let Some(id) = component.selected.clone() else {
                return false;
            };
            if component.busy {
                return false;
            }
            component.busy = true;
            let admission_number = component.admission_number.trim();
            let request = ApprovalRequest {
                admission_number: (!admission_number.is_empty()).then(|| admission_number.to_string()),
                ..ApprovalRequest::default()
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let url = format!("{}/item/{}/approve", SUBMISSIONS_URL, id);
                match post_json::<_, ApprovalResult>(&url, &request).await {
                    Ok(result) => link.send_message(Msg::Approved(result)),
                    Err(err) => link.send_message(Msg::ActionFailed(err)),
                }
            });
            true
        }
        Msg::Approved(result) => {
            component.busy = false;
            show_toast(
                &format!("Admitted {} as {}", result.admission_number, result.username),
                Tone::Info,
            );
            component.approval = Some(result);
            component.selected = None;
            open_top_sheet(component.result_sheet_ref.clone());
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::Reject => {
            let Some(id) = component.selected.clone() else {
                return false;
            };
            if component.busy {
                return false;
            }
            component.busy = true;
            let note = component.note.trim();
            let request = RejectRequest {
                note: (!note.is_empty()).then(|| note.to_string()),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let url = format!("{}/item/{}/reject", SUBMISSIONS_URL, id);
                match post_json::<_, Submission>(&url, &request).await {
                    Ok(submission) => link.send_message(Msg::Rejected(submission)),
                    Err(err) => link.send_message(Msg::ActionFailed(err)),
                }
            });
            true
        }
        Msg::Rejected(submission) => {
            component.busy = false;
            component.selected = None;
            show_toast(&format!("Rejected submission {}", submission.id), Tone::Info);
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::ActionFailed(err) => {
            component.busy = false;
            component.loading = false;
            show_toast(&err.message, Tone::Error);
            true
        }
        Msg::CloseResult => {
            component.approval = None;
            close_top_sheet(component.result_sheet_ref.clone());
            true
        }
        Msg::StartPromotion => {
            if component.promotion.as_ref().is_some_and(|(_, s)| !is_finished(s)) {
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                let url = "/api/promotion/start";
                match post_json::<_, JobStarted>(url, &StartPromotionRequest::default()).await {
                    Ok(started) => link.send_message(Msg::PromotionStarted(started.job_id)),
                    Err(err) => link.send_message(Msg::ActionFailed(err)),
                }
            });
            false
        }
        Msg::PromotionStarted(job_id) => {
            component.promotion = Some((job_id.clone(), JobStatus::Pending));
            poll_promotion(ctx, job_id);
            true
        }
        Msg::PromotionPolled(status) => {
            if let JobStatus::Failed(reason) = &status {
                show_toast(&format!("Promotion failed: {}", reason), Tone::Error);
            }
            if let Some((_, current)) = &mut component.promotion {
                *current = status;
            }
            true
        }
    }
}

/// Polls the job until it completes or fails.
fn poll_promotion(ctx: &Context<ReviewComponent>, job_id: String) {
    let link = ctx.link().clone();
    let interval = ctx.props().poll_millis;
    spawn_local(async move {
        let url = format!("/api/promotion/status/{}", job_id);
        loop {
            gloo_timers::future::TimeoutFuture::new(interval).await;
            match get_json::<JobStatus>(&url, &[]).await {
                Ok(status) => {
                    let done = is_finished(&status);
                    link.send_message(Msg::PromotionPolled(status));
                    if done {
                        break;
                    }
                }
                Err(err) => {
                    link.send_message(Msg::ActionFailed(err));
                    break;
                }
            }
        }
    });
}
