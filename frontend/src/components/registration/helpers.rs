//! Pure helpers behind the registration form: answer bookkeeping, checkbox values
//! and the document requirement lookup key. Nothing here touches the DOM.

use std::collections::HashMap;

use common::model::form::Form;
use common::render::{ReferenceData, Selection, Slot};

/// Key of the answer that picks the academic stage for document requirements.
pub const ACADEMIC_STAGE_KEY: &str = "academic_stage";

/// Records `value` for `key` and, when the field drives the cascade, clears the
/// answers of every field whose slot was reset.
pub fn apply_value(
    form: &Form,
    selection: &mut Selection,
    values: &mut HashMap<String, String>,
    key: &str,
    value: &str,
) {
    if let Some(slot) = form.field(key).and_then(Slot::for_field) {
        let cleared = selection.set(slot, value);
        for field in &form.fields {
            if Slot::for_field(field).is_some_and(|s| cleared.contains(&s)) {
                values.remove(&field.key);
            }
        }
    }

    if value.trim().is_empty() {
        values.remove(key);
    } else {
        values.insert(key.to_string(), value.to_string());
    }
}

/// Adds or removes `option` from a comma separated checkbox answer.
pub fn toggle_option(current: Option<&str>, option: &str, checked: bool) -> String {
    let mut chosen: Vec<&str> = current
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != option)
        .collect();
    if checked {
        chosen.push(option);
    }
    chosen.join(",")
}

pub fn is_checked(current: Option<&str>, option: &str) -> bool {
    current
        .unwrap_or("")
        .split(',')
        .any(|o| o.trim() == option)
}

/// `(course_type, academic_stage)` to load requirements for, once both are known.
///
/// The course type is the `level` of the selected course.
pub fn requirement_key(
    reference: &ReferenceData,
    selection: &Selection,
    values: &HashMap<String, String>,
) -> Option<(String, String)> {
    let level = selection
        .course
        .as_deref()
        .and_then(|name| reference.course(name))
        .and_then(|course| course.level.as_deref())
        .map(str::trim)
        .filter(|l| !l.is_empty())?;
    let stage = values
        .get(ACADEMIC_STAGE_KEY)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())?;
    Some((level.to_string(), stage.to_string()))
}
