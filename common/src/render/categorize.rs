use crate::model::form::{FieldCategory, Form, FormField};

const CONTACT: &[&str] = &["mobile", "phone", "email", "contact", "whatsapp"];
const ADDRESS: &[&str] = &[
    "address", "city", "village", "mandal", "district", "state", "pincode", "pin_code",
];
const ACADEMIC: &[&str] = &[
    "college", "course", "branch", "batch", "year", "semester", "admission", "roll",
    "qualification", "stage",
];
const BASIC: &[&str] = &[
    "name", "gender", "dob", "birth", "father", "mother", "caste", "religion", "adhar",
    "aadhaar", "blood",
];
const ADDITIONAL: &[&str] = &[
    "remark", "note", "photo", "document", "certificate", "scholar", "fee", "hobby",
];

/// Section of a field: its explicit `category` tag, else a keyword match on key and label.
///
/// Keyword groups are tried in a fixed order (contact, address, academic, basic,
/// additional) so that e.g. `father_mobile` lands in contact rather than basic.
pub fn categorize(field: &FormField) -> FieldCategory {
    if let Some(category) = field.category {
        return category;
    }
    let haystack = format!("{} {}", field.key, field.label).to_lowercase();
    let rules = [
        (CONTACT, FieldCategory::Contact),
        (ADDRESS, FieldCategory::Address),
        (ACADEMIC, FieldCategory::Academic),
        (BASIC, FieldCategory::Basic),
        (ADDITIONAL, FieldCategory::Additional),
    ];
    rules
        .iter()
        .find(|(words, _)| words.iter().any(|w| haystack.contains(w)))
        .map(|(_, category)| *category)
        .unwrap_or(FieldCategory::Other)
}

/// Enabled fields grouped by section, sections in display order, empty ones omitted.
pub fn group_fields(form: &Form) -> Vec<(FieldCategory, Vec<&FormField>)> {
    FieldCategory::ORDER
        .iter()
        .filter_map(|category| {
            let fields: Vec<&FormField> = form
                .fields
                .iter()
                .filter(|f| f.is_enabled && categorize(f) == *category)
                .collect();
            (!fields.is_empty()).then_some((*category, fields))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::tests::field;
    use crate::model::form::FieldType;

    #[test]
    fn keywords_pick_sections() {
        let cases = [
            ("student_name", "Student Name", FieldCategory::Basic),
            ("father_mobile", "Father Mobile", FieldCategory::Contact),
            ("email", "Email", FieldCategory::Contact),
            ("current_year", "Year", FieldCategory::Academic),
            ("admission_number", "Admission No", FieldCategory::Academic),
            ("city_village", "City / Village", FieldCategory::Address),
            ("student_photo", "Photo", FieldCategory::Additional),
            ("shoe_size", "Shoe size", FieldCategory::Other),
        ];
        for (key, label, expected) in cases {
            assert_eq!(categorize(&field(key, label, FieldType::Text)), expected, "{key}");
        }
    }

    #[test]
    fn label_is_considered_too() {
        assert_eq!(
            categorize(&field("q7", "Blood group", FieldType::Text)),
            FieldCategory::Basic
        );
    }

    #[test]
    fn explicit_tag_wins() {
        let mut f = field("student_mobile", "Mobile", FieldType::Tel);
        f.category = Some(FieldCategory::Basic);
        assert_eq!(categorize(&f), FieldCategory::Basic);
    }

    #[test]
    fn groups_follow_display_order_and_skip_disabled() {
        let mut disabled = field("remarks", "Remarks", FieldType::Textarea);
        disabled.is_enabled = false;
        let form = Form {
            id: "f".to_string(),
            name: "Admissions".to_string(),
            description: None,
            fields: vec![
                field("student_mobile", "Mobile", FieldType::Tel),
                field("course", "Course", FieldType::Text),
                field("student_name", "Name", FieldType::Text),
                field("branch", "Branch", FieldType::Text),
                disabled,
            ],
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        let groups = group_fields(&form);
        let summary: Vec<(FieldCategory, Vec<&str>)> = groups
            .iter()
            .map(|(c, fs)| (*c, fs.iter().map(|f| f.key.as_str()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (FieldCategory::Basic, vec!["student_name"]),
                (FieldCategory::Academic, vec!["course", "branch"]),
                (FieldCategory::Contact, vec!["student_mobile"]),
            ]
        );
    }
}
