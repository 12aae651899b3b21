//! View of the review screen: status tabs, submissions table, detail panel,
//! promotion controls, and the one-time credentials sheet.

use common::model::submission::{Submission, SubmissionStatus};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::helpers::{job_label, short_id, sorted_answers, summary_value, SUMMARY_KEYS};
use super::messages::Msg;
use super::state::ReviewComponent;

const FILTERS: [SubmissionStatus; 3] = [
    SubmissionStatus::Pending,
    SubmissionStatus::Approved,
    SubmissionStatus::Rejected,
];

pub fn view(component: &ReviewComponent, ctx: &Context<ReviewComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="review-root">
            <h1>{ "Registrations" }</h1>
            { build_promotion_bar(component, link) }
            { build_tab_bar(component, link) }
            <div class="review-body">
                { build_table(component, link) }
                { build_detail(component, link) }
            </div>
            { result_sheet(component, link) }
        </div>
    }
}

fn build_tab_bar(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    html! {
        <div class="tab-bar">
            { for FILTERS.iter().map(|status| {
                let status = *status;
                html! {
                    <button
                        class={classes!("tab-btn", (component.filter == status).then_some("active"))}
                        onclick={link.callback(move |_| Msg::SetFilter(status))}
                    >
                        { status.as_str() }
                    </button>
                }
            }) }
            <button class="icon-btn" title="Reload" onclick={link.callback(|_| Msg::Load)}>
                <i class="material-icons">{ "refresh" }</i>
            </button>
        </div>
    }
}

fn build_table(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    if component.loading {
        return html! { <div class="review-loading">{ "Loading..." }</div> };
    }
    if component.submissions.is_empty() {
        return html! { <div class="review-empty">{ "No submissions." }</div> };
    }

    html! {
        <table class="review-table">
            <thead>
                <tr>
                    <th>{ "Id" }</th>
                    <th>{ "Received" }</th>
                    { for SUMMARY_KEYS.iter().map(|key| html! { <th>{ *key }</th> }) }
                    <th>{ "Certificates" }</th>
                </tr>
            </thead>
            <tbody>
                { for component.submissions.iter().map(|submission| table_row(component, link, submission)) }
            </tbody>
        </table>
    }
}

fn table_row(component: &ReviewComponent, link: &Scope<ReviewComponent>, submission: &Submission) -> Html {
    let id = submission.id.clone();
    let selected = component.selected.as_deref() == Some(submission.id.as_str());
    html! {
        <tr
            class={classes!(selected.then_some("selected"))}
            onclick={link.callback(move |_| Msg::Select(Some(id.clone())))}
        >
            <td><code>{ short_id(&submission.id) }</code></td>
            <td>{ submission.created_at.clone() }</td>
            { for SUMMARY_KEYS.iter().map(|key| html! { <td>{ summary_value(submission, key) }</td> }) }
            <td>{ submission.certificates_status.as_str() }</td>
        </tr>
    }
}

fn build_detail(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    let Some(submission) = component.selected_submission() else {
        return html! {};
    };

    html! {
        <aside class="review-detail">
            <button class="icon-btn" title="Close" onclick={link.callback(|_| Msg::Select(None))}>
                <i class="material-icons">{ "close" }</i>
            </button>
            <h2>{ summary_value(submission, "student_name") }</h2>
            <dl>
                { for sorted_answers(submission).into_iter().map(|(key, value)| html! {
                    <>
                        <dt>{ key }</dt>
                        <dd>{ value }</dd>
                    </>
                }) }
            </dl>
            <h3>{ "Documents" }</h3>
            {
                if submission.documents.is_empty() {
                    html! { <p>{ "None uploaded." }</p> }
                } else {
                    html! {
                        <ul>
                            { for submission.documents.iter().map(|d| html! {
                                <li>{ format!("{} ({}, {} bytes)", d.name, d.original_filename, d.size_bytes) }</li>
                            }) }
                        </ul>
                    }
                }
            }
            {
                match &submission.review_note {
                    Some(note) => html! { <p class="review-note">{ format!("Note: {}", note) }</p> },
                    None => html! {},
                }
            }
            {
                if submission.status == SubmissionStatus::Pending {
                    build_actions(component, link)
                } else {
                    html! {}
                }
            }
        </aside>
    }
}

fn build_actions(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    let on_admission = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetAdmissionNumber(input.value())
    });
    let on_note = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetNote(input.value())
    });

    html! {
        <div class="review-actions">
            <label for="admission-number">{ "Admission number" }</label>
            <input
                id="admission-number"
                type="text"
                value={component.admission_number.clone()}
                oninput={on_admission}
            />
            <button class="approve-btn" disabled={component.busy} onclick={link.callback(|_| Msg::Approve)}>
                { "Approve" }
            </button>
            <label for="review-note">{ "Rejection note" }</label>
            <input id="review-note" type="text" value={component.note.clone()} oninput={on_note} />
            <button class="reject-btn" disabled={component.busy} onclick={link.callback(|_| Msg::Reject)}>
                { "Reject" }
            </button>
        </div>
    }
}

fn build_promotion_bar(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    html! {
        <div class="promotion-bar">
            <button class="icon-btn" title="Promote regular students" onclick={link.callback(|_| Msg::StartPromotion)}>
                <i class="material-icons">{ "upgrade" }</i>
                <span class="icon-label">{ "Promote" }</span>
            </button>
            {
                match &component.promotion {
                    Some((_, status)) => html! { <span class="job-status">{ job_label(status) }</span> },
                    None => html! {},
                }
            }
        </div>
    }
}

fn result_sheet(component: &ReviewComponent, link: &Scope<ReviewComponent>) -> Html {
    let body = match &component.approval {
        Some(result) => html! {
            <>
                <h2>{ "Student admitted" }</h2>
                <p>{ "Admission number: " }<strong>{ result.admission_number.clone() }</strong></p>
                <p>{ "Username: " }<code>{ result.username.clone() }</code></p>
                <p>{ "Password: " }<code>{ result.password.clone() }</code></p>
                <p class="hint">{ "The password is shown only once." }</p>
            </>
        },
        None => html! {},
    };

    html! {
        <YwMaterialTopSheet
            node_ref={component.result_sheet_ref.clone()}
            on_close={link.callback(|_: MouseEvent| Msg::CloseResult)}
        >
            { body }
        </YwMaterialTopSheet>
    }
}
