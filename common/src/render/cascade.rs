//! Cascading selection state of the public form.
//!
//! Reset rules when a slot changes to a different value:
//! - college clears course, branch, year and semester;
//! - course clears branch, year and semester;
//! - branch clears year and semester;
//! - batch clears year and semester.

use crate::model::form::{FieldSource, FormField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    College,
    Course,
    Branch,
    Batch,
    Year,
    Semester,
}

impl Slot {
    /// Slots cleared when this slot changes.
    pub fn dependents(self) -> &'static [Slot] {
        match self {
            Slot::College => &[Slot::Course, Slot::Branch, Slot::Year, Slot::Semester],
            Slot::Course => &[Slot::Branch, Slot::Year, Slot::Semester],
            Slot::Branch | Slot::Batch => &[Slot::Year, Slot::Semester],
            Slot::Year | Slot::Semester => &[],
        }
    }

    /// Slot driven by a form field: its reference source, else a well-known key.
    pub fn for_field(field: &FormField) -> Option<Slot> {
        match field.source {
            FieldSource::Colleges => Some(Slot::College),
            FieldSource::Courses => Some(Slot::Course),
            FieldSource::Branches => Some(Slot::Branch),
            FieldSource::Batches => Some(Slot::Batch),
            FieldSource::Years => Some(Slot::Year),
            FieldSource::Semesters => Some(Slot::Semester),
            FieldSource::Static => match field.key.as_str() {
                "college" => Some(Slot::College),
                "course" => Some(Slot::Course),
                "branch" => Some(Slot::Branch),
                "batch" => Some(Slot::Batch),
                "current_year" => Some(Slot::Year),
                "current_semester" => Some(Slot::Semester),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub college: Option<String>,
    pub course: Option<String>,
    pub branch: Option<String>,
    pub batch: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
}

impl Selection {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slot(slot).as_deref()
    }

    /// Sets `slot` and applies the reset rules. Returns the slots that were cleared.
    ///
    /// Blank values unset the slot. Re-selecting the current value clears nothing.
    pub fn set(&mut self, slot: Slot, value: &str) -> Vec<Slot> {
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        if *self.slot(slot) == value {
            return Vec::new();
        }
        *self.slot_mut(slot) = value;

        let mut cleared = Vec::new();
        for dependent in slot.dependents() {
            if self.slot_mut(*dependent).take().is_some() {
                cleared.push(*dependent);
            }
        }
        cleared
    }

    fn slot(&self, slot: Slot) -> &Option<String> {
        match slot {
            Slot::College => &self.college,
            Slot::Course => &self.course,
            Slot::Branch => &self.branch,
            Slot::Batch => &self.batch,
            Slot::Year => &self.year,
            Slot::Semester => &self.semester,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::College => &mut self.college,
            Slot::Course => &mut self.course,
            Slot::Branch => &mut self.branch,
            Slot::Batch => &mut self.batch,
            Slot::Year => &mut self.year,
            Slot::Semester => &mut self.semester,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::tests::field;
    use crate::model::form::FieldType;

    fn filled() -> Selection {
        Selection {
            college: Some("Pydah College".to_string()),
            course: Some("B.Tech".to_string()),
            branch: Some("CSE".to_string()),
            batch: Some("2024-2025".to_string()),
            year: Some("2".to_string()),
            semester: Some("1".to_string()),
        }
    }

    #[test]
    fn changing_course_clears_branch_year_semester() {
        let mut selection = filled();
        let cleared = selection.set(Slot::Course, "Diploma");
        assert_eq!(cleared, vec![Slot::Branch, Slot::Year, Slot::Semester]);
        assert_eq!(selection.get(Slot::Course), Some("Diploma"));
        assert_eq!(selection.branch, None);
        assert_eq!(selection.year, None);
        assert_eq!(selection.semester, None);
        assert_eq!(selection.get(Slot::Batch), Some("2024-2025"));
    }

    #[test]
    fn changing_branch_or_batch_clears_year_and_semester() {
        let mut selection = filled();
        selection.set(Slot::Branch, "ECE");
        assert_eq!((selection.year.as_deref(), selection.semester.as_deref()), (None, None));
        assert_eq!(selection.get(Slot::Course), Some("B.Tech"));

        let mut selection = filled();
        selection.set(Slot::Batch, "2025-2026");
        assert_eq!((selection.year.as_deref(), selection.semester.as_deref()), (None, None));
        assert_eq!(selection.get(Slot::Branch), Some("CSE"));
    }

    #[test]
    fn changing_college_clears_the_whole_chain() {
        let mut selection = filled();
        selection.set(Slot::College, "Other College");
        assert_eq!(selection.course, None);
        assert_eq!(selection.branch, None);
        assert_eq!(selection.get(Slot::Batch), Some("2024-2025"));
    }

    #[test]
    fn reselecting_same_value_keeps_dependents() {
        let mut selection = filled();
        assert!(selection.set(Slot::Course, " B.Tech ").is_empty());
        assert_eq!(selection, filled());
    }

    #[test]
    fn blank_value_unsets_slot() {
        let mut selection = filled();
        selection.set(Slot::Semester, "");
        assert_eq!(selection.semester, None);
        assert_eq!(selection.get(Slot::Year), Some("2"));
    }

    #[test]
    fn slots_follow_source_then_key() {
        let mut bound = field("programme", "Programme", FieldType::Select);
        bound.source = FieldSource::Courses;
        assert_eq!(Slot::for_field(&bound), Some(Slot::Course));
        assert_eq!(
            Slot::for_field(&field("current_year", "Year", FieldType::Text)),
            Some(Slot::Year)
        );
        assert_eq!(Slot::for_field(&field("student_name", "Name", FieldType::Text)), None);
    }
}
