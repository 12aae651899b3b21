//! # Form schema
//!
//! A `Form` is an admin-defined, ordered list of `FormField`s rendered as the public
//! registration form. The backend persists `fields` as one JSON document per form
//! (`forms.fields`), and the frontend renders one input per enabled field.
//!
//! Invariants enforced by `FormSpec::validate`:
//! - the form name is not blank;
//! - every field `key` is non-blank and unique within the form;
//! - `select`, `radio` and `checkbox` fields bound to static data carry at least one option.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Input type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Tel,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    File,
}

impl FieldType {
    /// Whether the field offers a fixed set of choices.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }
}

/// Visual group of a field on the public form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Basic,
    Academic,
    Contact,
    Address,
    Additional,
    Other,
}

impl FieldCategory {
    /// Display order of the groups.
    pub const ORDER: [FieldCategory; 6] = [
        FieldCategory::Basic,
        FieldCategory::Academic,
        FieldCategory::Contact,
        FieldCategory::Address,
        FieldCategory::Additional,
        FieldCategory::Other,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FieldCategory::Basic => "Basic Information",
            FieldCategory::Academic => "Academic Information",
            FieldCategory::Contact => "Contact Information",
            FieldCategory::Address => "Address",
            FieldCategory::Additional => "Additional Information",
            FieldCategory::Other => "Other",
        }
    }
}

/// Where a choice field takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Options listed on the field itself.
    #[default]
    Static,
    Colleges,
    Courses,
    Branches,
    Batches,
    Years,
    Semesters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldCategory>,
    #[serde(default)]
    pub source: FieldSource,
}

fn default_enabled() -> bool {
    true
}

impl FormField {
    /// Options to offer for a static choice field; empty for anything else.
    pub fn static_options(&self) -> &[String] {
        match (&self.options, self.source) {
            (Some(options), FieldSource::Static) => options,
            _ => &[],
        }
    }
}

/// A persisted form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Form {
    /// Copy of the form as shown to the public: disabled fields removed.
    pub fn public_view(&self) -> Form {
        Form {
            fields: self
                .fields
                .iter()
                .filter(|f| f.is_enabled)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Listing row for the admin screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub field_count: usize,
    pub pending_submissions: u32,
}

/// Admin payload for `POST /api/forms` and `PUT /api/forms/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    #[serde(default = "default_enabled")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("form name must not be empty")]
    EmptyName,
    #[error("field #{0} has an empty key")]
    EmptyKey(usize),
    #[error("duplicate field key '{0}'")]
    DuplicateKey(String),
    #[error("field '{key}' of type {field_type} requires options")]
    MissingOptions { key: String, field_type: FieldType },
}

impl FormError {
    /// The field key the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            FormError::DuplicateKey(key) | FormError::MissingOptions { key, .. } => Some(key),
            FormError::EmptyName | FormError::EmptyKey(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::File => "file",
        };
        f.write_str(name)
    }
}

impl FormSpec {
    /// Checks the schema invariants, reporting the first violation in field order.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyName);
        }

        let mut seen = HashSet::new();
        for (idx, field) in self.fields.iter().enumerate() {
            let key = field.key.trim();
            if key.is_empty() {
                return Err(FormError::EmptyKey(idx));
            }
            if !seen.insert(key) {
                return Err(FormError::DuplicateKey(key.to_string()));
            }
            let has_options = field
                .options
                .as_ref()
                .is_some_and(|opts| opts.iter().any(|o| !o.trim().is_empty()));
            if field.field_type.is_choice() && field.source == FieldSource::Static && !has_options
            {
                return Err(FormError::MissingOptions {
                    key: key.to_string(),
                    field_type: field.field_type,
                });
            }
        }
        Ok(())
    }

    /// Normalized copy: trimmed keys and names, blank options dropped.
    pub fn normalized(&self) -> FormSpec {
        let fields = self
            .fields
            .iter()
            .map(|f| FormField {
                key: f.key.trim().to_string(),
                label: f.label.trim().to_string(),
                options: f.options.as_ref().map(|opts| {
                    opts.iter()
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                }),
                ..f.clone()
            })
            .collect();
        FormSpec {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            fields,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn field(key: &str, label: &str, field_type: FieldType) -> FormField {
        FormField {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required: false,
            is_enabled: true,
            options: None,
            placeholder: None,
            category: None,
            source: FieldSource::Static,
        }
    }

    fn spec(fields: Vec<FormField>) -> FormSpec {
        FormSpec {
            name: "Admissions 2025".to_string(),
            description: None,
            fields,
            is_active: true,
        }
    }

    #[test]
    fn select_without_options_is_rejected() {
        let mut gender = field("gender", "Gender", FieldType::Select);
        gender.options = Some(vec![]);
        let err = spec(vec![gender]).validate().unwrap_err();
        assert_eq!(
            err,
            FormError::MissingOptions {
                key: "gender".to_string(),
                field_type: FieldType::Select
            }
        );
        assert_eq!(err.field(), Some("gender"));
    }

    #[test]
    fn blank_options_do_not_count() {
        let mut radio = field("quota", "Quota", FieldType::Radio);
        radio.options = Some(vec!["  ".to_string()]);
        assert!(spec(vec![radio]).validate().is_err());
    }

    #[test]
    fn reference_bound_select_needs_no_options() {
        let mut course = field("course", "Course", FieldType::Select);
        course.source = FieldSource::Courses;
        assert_eq!(spec(vec![course]).validate(), Ok(()));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let fields = vec![
            field("student_name", "Name", FieldType::Text),
            field(" student_name ", "Full name", FieldType::Text),
        ];
        assert_eq!(
            spec(fields).validate(),
            Err(FormError::DuplicateKey("student_name".to_string()))
        );
    }

    #[test]
    fn empty_key_and_name_are_rejected() {
        assert_eq!(
            spec(vec![field("", "Name", FieldType::Text)]).validate(),
            Err(FormError::EmptyKey(0))
        );
        let mut s = spec(vec![]);
        s.name = " ".to_string();
        assert_eq!(s.validate(), Err(FormError::EmptyName));
    }

    #[test]
    fn public_view_hides_disabled_fields() {
        let mut hidden = field("caste", "Caste", FieldType::Text);
        hidden.is_enabled = false;
        let form = Form {
            id: "f1".to_string(),
            name: "Admissions".to_string(),
            description: None,
            fields: vec![field("student_name", "Name", FieldType::Text), hidden],
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        let public = form.public_view();
        assert_eq!(public.fields.len(), 1);
        assert_eq!(public.fields[0].key, "student_name");
    }

    #[test]
    fn field_json_defaults() {
        let parsed: FormField =
            serde_json::from_str(r#"{"key":"dob","label":"Date of birth","field_type":"date"}"#)
                .unwrap();
        assert!(parsed.is_enabled);
        assert!(!parsed.required);
        assert_eq!(parsed.source, FieldSource::Static);
        assert_eq!(parsed.category, None);
    }

    #[test]
    fn normalized_trims_keys_and_drops_blank_options() {
        let mut select = field(" gender ", " Gender ", FieldType::Select);
        select.options = Some(vec!["Male".to_string(), " ".to_string(), " Female".to_string()]);
        let normalized = spec(vec![select]).normalized();
        assert_eq!(normalized.fields[0].key, "gender");
        assert_eq!(normalized.fields[0].label, "Gender");
        assert_eq!(
            normalized.fields[0].options,
            Some(vec!["Male".to_string(), "Female".to_string()])
        );
    }
}
