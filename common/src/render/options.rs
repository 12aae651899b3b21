//! Option derivation for reference-bound inputs.

use crate::model::form::{FieldSource, FieldType, FormField};
use crate::model::reference::{start_year_of, AcademicYear, College, Course};
use crate::render::cascade::Selection;
use serde::{Deserialize, Serialize};

/// Number of academic-year ranges synthesized from a batch when the course has no structure.
pub const SYNTHESIZED_YEARS: i32 = 4;

/// The three reference datasets the public form is rendered against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub colleges: Vec<College>,
    pub courses: Vec<Course>,
    pub academic_years: Vec<AcademicYear>,
}

impl ReferenceData {
    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    pub fn college(&self, name: &str) -> Option<&College> {
        self.colleges.iter().find(|c| c.name == name)
    }

    pub fn academic_year(&self, label: &str) -> Option<&AcademicYear> {
        self.academic_years.iter().find(|y| y.year_label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

impl ChoiceOption {
    fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        ChoiceOption {
            label: value.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchInput {
    Select(Vec<String>),
    FreeText,
}

/// What the frontend renders for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// `<input>` with the given HTML type (`text`, `email`, `tel`, `number`, `date`).
    Input(&'static str),
    Textarea,
    Select(Vec<ChoiceOption>),
    Radio(Vec<String>),
    Checkbox(Vec<String>),
    File,
}

/// Branch input for a course: a dropdown of its active branches, or free text when
/// the course has none. Branches scoped to a different academic year are left out.
pub fn branch_input(course: Option<&Course>, academic_year_id: Option<i64>) -> BranchInput {
    let names: Vec<String> = course
        .map(|c| {
            c.branches
                .iter()
                .filter(|b| b.is_active)
                .filter(|b| match (b.academic_year_id, academic_year_id) {
                    (Some(scoped), Some(selected)) => scoped == selected,
                    _ => true,
                })
                .map(|b| b.name.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }

    if unique.is_empty() {
        BranchInput::FreeText
    } else {
        BranchInput::Select(unique)
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Year options: the course's configured years, else synthesized academic-year
/// ranges (`2023-24`, `2024-25`, ...) starting at the batch's start year.
pub fn year_options(course: Option<&Course>, batch: Option<&str>) -> Vec<ChoiceOption> {
    let years = course.map(Course::structured_years).unwrap_or_default();
    if !years.is_empty() {
        return years
            .into_iter()
            .map(|y| ChoiceOption {
                value: y.to_string(),
                label: format!("{} Year", ordinal(y)),
            })
            .collect();
    }

    match batch.and_then(start_year_of) {
        Some(start) => (0..SYNTHESIZED_YEARS)
            .map(|offset| {
                let from = start + offset;
                ChoiceOption::plain(format!("{}-{:02}", from, (from + 1) % 100))
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Semester options for the selected year; empty until a year is chosen.
pub fn semester_options(course: Option<&Course>, year: Option<&str>) -> Vec<ChoiceOption> {
    let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) else {
        return Vec::new();
    };
    let count = match (course, year.parse::<u8>()) {
        (Some(course), Ok(year)) => course.semesters_in_year(year),
        (Some(course), Err(_)) if course.semesters_per_year > 0 => course.semesters_per_year,
        _ => crate::model::reference::DEFAULT_SEMESTERS_PER_YEAR,
    };
    (1..=count)
        .map(|s| ChoiceOption {
            value: s.to_string(),
            label: format!("{} Semester", ordinal(s)),
        })
        .collect()
}

/// Resolves the input to render for `field` given the reference data and the
/// current cascading selection.
pub fn field_input_kind(
    field: &FormField,
    reference: &ReferenceData,
    selection: &Selection,
) -> InputKind {
    let course = selection.course.as_deref().and_then(|c| reference.course(c));
    match field.source {
        FieldSource::Static => match field.field_type {
            FieldType::Text => InputKind::Input("text"),
            FieldType::Email => InputKind::Input("email"),
            FieldType::Tel => InputKind::Input("tel"),
            FieldType::Number => InputKind::Input("number"),
            FieldType::Date => InputKind::Input("date"),
            FieldType::Textarea => InputKind::Textarea,
            FieldType::File => InputKind::File,
            FieldType::Select => InputKind::Select(
                field
                    .static_options()
                    .iter()
                    .map(|o| ChoiceOption::plain(o.as_str()))
                    .collect(),
            ),
            FieldType::Radio => InputKind::Radio(field.static_options().to_vec()),
            FieldType::Checkbox => InputKind::Checkbox(field.static_options().to_vec()),
        },
        FieldSource::Colleges => InputKind::Select(
            reference
                .colleges
                .iter()
                .filter(|c| c.is_active)
                .map(|c| ChoiceOption::plain(c.name.as_str()))
                .collect(),
        ),
        FieldSource::Courses => {
            let college_id = selection
                .college
                .as_deref()
                .and_then(|c| reference.college(c))
                .map(|c| c.id);
            InputKind::Select(
                reference
                    .courses
                    .iter()
                    .filter(|c| c.is_active)
                    .filter(|c| match (c.college_id, college_id) {
                        (Some(owner), Some(selected)) => owner == selected,
                        _ => true,
                    })
                    .map(|c| ChoiceOption::plain(c.name.as_str()))
                    .collect(),
            )
        }
        FieldSource::Branches => {
            let academic_year_id = selection
                .batch
                .as_deref()
                .and_then(|b| reference.academic_year(b))
                .map(|y| y.id);
            match branch_input(course, academic_year_id) {
                BranchInput::Select(names) => InputKind::Select(
                    names.into_iter().map(ChoiceOption::plain).collect(),
                ),
                BranchInput::FreeText => InputKind::Input("text"),
            }
        }
        FieldSource::Batches => InputKind::Select(
            reference
                .academic_years
                .iter()
                .filter(|y| y.is_active)
                .map(|y| ChoiceOption::plain(y.year_label.as_str()))
                .collect(),
        ),
        FieldSource::Years => InputKind::Select(year_options(course, selection.batch.as_deref())),
        FieldSource::Semesters => {
            InputKind::Select(semester_options(course, selection.year.as_deref()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::tests::field;
    use crate::model::reference::tests::course;
    use crate::model::reference::{Branch, YearSemesters};

    fn branch(id: i64, name: &str, academic_year_id: Option<i64>) -> Branch {
        Branch {
            id,
            course_id: 1,
            name: name.to_string(),
            code: None,
            academic_year_id,
            is_active: true,
        }
    }

    fn values(options: &[ChoiceOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn course_without_branches_gets_free_text() {
        assert_eq!(branch_input(Some(&course(3, 2)), None), BranchInput::FreeText);
        assert_eq!(branch_input(None, None), BranchInput::FreeText);
    }

    #[test]
    fn branches_scoped_to_other_years_are_hidden() {
        let mut btech = course(4, 2);
        btech.branches = vec![
            branch(1, "CSE", None),
            branch(2, "AIML", Some(7)),
            branch(3, "ECE", Some(8)),
            branch(4, "CSE", Some(7)),
        ];
        assert_eq!(
            branch_input(Some(&btech), Some(7)),
            BranchInput::Select(vec!["CSE".to_string(), "AIML".to_string()])
        );
        assert_eq!(
            branch_input(Some(&btech), None),
            BranchInput::Select(vec!["CSE".to_string(), "AIML".to_string(), "ECE".to_string()])
        );
    }

    #[test]
    fn year_options_prefer_course_structure() {
        let options = year_options(Some(&course(3, 2)), Some("2024"));
        assert_eq!(values(&options), vec!["1", "2", "3"]);
        assert_eq!(options[0].label, "1st Year");
        assert_eq!(options[2].label, "3rd Year");
    }

    #[test]
    fn year_options_fall_back_to_batch_ranges() {
        let options = year_options(Some(&course(0, 0)), Some("2023-2024"));
        assert_eq!(values(&options), vec!["2023-24", "2024-25", "2025-26", "2026-27"]);
        assert!(year_options(None, None).is_empty());
        assert_eq!(values(&year_options(None, Some("2099")))[0], "2099-00");
    }

    #[test]
    fn semester_options_follow_config() {
        let mut pharm = course(0, 0);
        pharm.year_semester_config = Some(vec![YearSemesters { year: 1, semesters: 1 }]);
        assert_eq!(values(&semester_options(Some(&pharm), Some("1"))), vec!["1"]);
        assert_eq!(values(&semester_options(Some(&course(4, 3)), Some("2"))), vec!["1", "2", "3"]);
        assert_eq!(values(&semester_options(None, Some("2023-24"))), vec!["1", "2"]);
        assert!(semester_options(Some(&pharm), None).is_empty());
    }

    #[test]
    fn branch_field_without_branches_renders_text_input() {
        let mut reference = ReferenceData::default();
        reference.courses.push(course(3, 2));
        let mut branch_field = field("branch", "Branch", FieldType::Select);
        branch_field.source = FieldSource::Branches;
        let selection = Selection {
            course: Some("B.Tech".to_string()),
            ..Selection::default()
        };
        assert_eq!(
            field_input_kind(&branch_field, &reference, &selection),
            InputKind::Input("text")
        );
    }

    #[test]
    fn courses_are_filtered_by_selected_college() {
        let mut reference = ReferenceData::default();
        reference.colleges.push(College {
            id: 5,
            name: "Pydah Engineering".to_string(),
            code: None,
            is_active: true,
        });
        let mut owned = course(4, 2);
        owned.college_id = Some(5);
        let mut other = course(3, 2);
        other.name = "MBA".to_string();
        other.college_id = Some(6);
        let mut shared = course(2, 2);
        shared.name = "Diploma".to_string();
        reference.courses = vec![owned, other, shared];

        let mut course_field = field("course", "Course", FieldType::Select);
        course_field.source = FieldSource::Courses;
        let selection = Selection {
            college: Some("Pydah Engineering".to_string()),
            ..Selection::default()
        };
        match field_input_kind(&course_field, &reference, &selection) {
            InputKind::Select(options) => assert_eq!(values(&options), vec!["B.Tech", "Diploma"]),
            other => panic!("unexpected input kind {other:?}"),
        }
    }
}
