//! View of the registration form: one section per field category, an optional
//! documents section, and a top sheet with the receipt after a successful post.

use common::model::documents::{document_field_name, CertificatesStatus};
use common::model::form::{Form, FormField};
use common::render::{field_input_kind, group_fields, ChoiceOption, InputKind};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

use super::helpers::is_checked;
use super::messages::Msg;
use super::state::RegistrationForm;

pub fn view(component: &RegistrationForm, ctx: &Context<RegistrationForm>) -> Html {
    let link = ctx.link();

    let Some(form) = &component.form else {
        return match &component.load_error {
            Some(err) => html! { <div class="form-error">{ format!("This form is not available: {}", err) }</div> },
            None => html! { <div class="form-loading">{ "Loading form..." }</div> },
        };
    };

    let onsubmit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Submit
    });

    html! {
        <div class="registration-root">
            <h1>{ form.name.clone() }</h1>
            {
                match &form.description {
                    Some(description) => html! { <p class="form-description">{ description.clone() }</p> },
                    None => html! {},
                }
            }
            <form {onsubmit}>
                { build_sections(component, link, form) }
                { build_documents(component, link) }
                {
                    match component.error.as_ref().filter(|e| e.field.is_none()) {
                        Some(err) => html! { <div class="form-error">{ err.message.clone() }</div> },
                        None => html! {},
                    }
                }
                <button type="submit" class="submit-btn" disabled={component.submitting}>
                    { if component.submitting { "Submitting..." } else { "Submit" } }
                </button>
            </form>
            { receipt_sheet(component, link) }
        </div>
    }
}

fn build_sections(component: &RegistrationForm, link: &Scope<RegistrationForm>, form: &Form) -> Html {
    group_fields(form)
        .into_iter()
        .map(|(category, fields)| {
            html! {
                <fieldset class="form-section">
                    <legend>{ category.title() }</legend>
                    { for fields.into_iter().map(|field| field_row(component, link, field)) }
                </fieldset>
            }
        })
        .collect()
}

fn field_row(component: &RegistrationForm, link: &Scope<RegistrationForm>, field: &FormField) -> Html {
    let error = component.error_for(&field.key);
    html! {
        <div class={classes!("form-row", error.map(|_| "invalid"))}>
            <label for={field.key.clone()}>
                { field.label.clone() }
                { if field.required { html! { <span class="required">{ " *" }</span> } } else { html! {} } }
            </label>
            { field_input(component, link, field) }
            {
                match error {
                    Some(message) => html! { <span class="field-error">{ message.to_string() }</span> },
                    None => html! {},
                }
            }
        </div>
    }
}

fn field_input(component: &RegistrationForm, link: &Scope<RegistrationForm>, field: &FormField) -> Html {
    let key = field.key.clone();
    let value = component.values.get(&field.key).cloned().unwrap_or_default();
    let placeholder = field.placeholder.clone().unwrap_or_default();

    match field_input_kind(field, &component.reference, &component.selection) {
        InputKind::Input(input_type) => {
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::SetValue { key: key.clone(), value: input.value() }
            });
            html! {
                <input id={field.key.clone()} type={input_type} {value} {placeholder} {oninput} />
            }
        }
        InputKind::Textarea => {
            let oninput = link.callback(move |e: InputEvent| {
                let input: HtmlTextAreaElement = e.target_unchecked_into();
                Msg::SetValue { key: key.clone(), value: input.value() }
            });
            html! {
                <textarea id={field.key.clone()} {value} {placeholder} {oninput} rows="3" />
            }
        }
        InputKind::Select(options) => select_input(link, field, &value, options),
        InputKind::Radio(options) => {
            html! {
                <div class="choice-group" id={field.key.clone()}>
                    { for options.into_iter().map(|option| {
                        let key = key.clone();
                        let checked = option == value;
                        let chosen = option.clone();
                        let onchange = link.callback(move |_: Event| Msg::SetValue {
                            key: key.clone(),
                            value: chosen.clone(),
                        });
                        html! {
                            <label class="choice">
                                <input type="radio" name={field.key.clone()} {checked} {onchange} />
                                { option }
                            </label>
                        }
                    }) }
                </div>
            }
        }
        InputKind::Checkbox(options) => {
            html! {
                <div class="choice-group" id={field.key.clone()}>
                    { for options.into_iter().map(|option| {
                        let key = key.clone();
                        let checked = is_checked(Some(value.as_str()), &option);
                        let toggled = option.clone();
                        let onchange = link.callback(move |e: Event| {
                            let input: HtmlInputElement = e.target_unchecked_into();
                            Msg::ToggleOption {
                                key: key.clone(),
                                option: toggled.clone(),
                                checked: input.checked(),
                            }
                        });
                        html! {
                            <label class="choice">
                                <input type="checkbox" {checked} {onchange} />
                                { option }
                            </label>
                        }
                    }) }
                </div>
            }
        }
        InputKind::File => file_input(link, &field.key, key),
    }
}

fn select_input(
    link: &Scope<RegistrationForm>,
    field: &FormField,
    value: &str,
    options: Vec<ChoiceOption>,
) -> Html {
    let key = field.key.clone();
    let onchange = link.callback(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetValue { key: key.clone(), value: select.value() }
    });
    html! {
        <select id={field.key.clone()} {onchange}>
            <option value="" selected={value.is_empty()}>{ "Select..." }</option>
            { for options.into_iter().map(|option| html! {
                <option value={option.value.clone()} selected={option.value == value}>{ option.label }</option>
            }) }
        </select>
    }
}

fn file_input(link: &Scope<RegistrationForm>, id: &str, part: String) -> Html {
    let onchange = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetFile {
            part: part.clone(),
            file: input.files().and_then(|files| files.get(0)),
        }
    });
    html! { <input id={id.to_string()} type="file" {onchange} /> }
}

fn build_documents(component: &RegistrationForm, link: &Scope<RegistrationForm>) -> Html {
    if component.required_documents.is_empty() {
        return html! {};
    }

    let ontoggle = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::ToggleDocuments(input.checked())
    });

    html! {
        <fieldset class="form-section documents">
            <legend>{ "Documents" }</legend>
            <label class="choice">
                <input type="checkbox" checked={component.upload_documents} onchange={ontoggle} />
                { "Upload documents now" }
            </label>
            {
                if component.upload_documents {
                    html! {
                        { for component.required_documents.iter().map(|document| {
                            let part = document_field_name(document);
                            let attached = component.files.contains_key(&part);
                            html! {
                                <div class="form-row">
                                    <label for={part.clone()}>
                                        { document.clone() }
                                        { if attached { " ✓" } else { "" } }
                                    </label>
                                    { file_input(link, &part, part.clone()) }
                                </div>
                            }
                        }) }
                    }
                } else {
                    html! { <p class="hint">{ "Documents can be handed in at the office later." }</p> }
                }
            }
        </fieldset>
    }
}

fn receipt_sheet(component: &RegistrationForm, link: &Scope<RegistrationForm>) -> Html {
    let body = match &component.receipt {
        Some(receipt) => {
            let certificates = match receipt.certificates_status {
                CertificatesStatus::Submitted => "All required documents were received.",
                CertificatesStatus::Pending => "Some documents are still pending.",
            };
            html! {
                <>
                    <h2>{ "Registration received" }</h2>
                    <p>{ "Reference: " }<code>{ receipt.submission_id.clone() }</code></p>
                    <p>{ certificates }</p>
                </>
            }
        }
        None => html! {},
    };

    html! {
        <YwMaterialTopSheet
            node_ref={component.receipt_sheet_ref.clone()}
            on_close={link.callback(|_: MouseEvent| Msg::Reset)}
            close_label="Register another"
        >
            { body }
        </YwMaterialTopSheet>
    }
}
