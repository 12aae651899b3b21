//! Reference data: colleges, courses (with branches and year/semester structure)
//! and academic years. These slowly-changing tables constrain the values a student
//! record and the public form dropdowns may take.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub is_active: bool,
}

/// Semesters offered in one year of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSemesters {
    pub year: u8,
    pub semesters: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    /// `None` means the branch is offered in every academic year.
    #[serde(default)]
    pub academic_year_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub college_id: Option<i64>,
    /// Course type used to pick document requirements (`UG`, `PG`, `Diploma`, ...).
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub total_years: u8,
    #[serde(default)]
    pub semesters_per_year: u8,
    #[serde(default)]
    pub year_semester_config: Option<Vec<YearSemesters>>,
    pub is_active: bool,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// Outcome of moving a student one semester forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Advance { year: u8, semester: u8 },
    Completed,
}

pub const DEFAULT_SEMESTERS_PER_YEAR: u8 = 2;

impl Course {
    /// Years of study, ascending. Empty when the course has no configured structure.
    pub fn structured_years(&self) -> Vec<u8> {
        match self.year_semester_config.as_ref().filter(|c| !c.is_empty()) {
            Some(config) => {
                let mut years: Vec<u8> = config.iter().map(|c| c.year).filter(|y| *y > 0).collect();
                years.sort_unstable();
                years.dedup();
                years
            }
            None => (1..=self.total_years).collect(),
        }
    }

    pub fn semesters_in_year(&self, year: u8) -> u8 {
        let configured = self
            .year_semester_config
            .as_ref()
            .and_then(|config| config.iter().find(|c| c.year == year))
            .map(|c| c.semesters);
        match configured {
            Some(semesters) => semesters,
            None if self.semesters_per_year > 0 => self.semesters_per_year,
            None => DEFAULT_SEMESTERS_PER_YEAR,
        }
    }

    /// Position after the given (year, semester); `None` when the course has no structure.
    pub fn next_position(&self, year: u8, semester: u8) -> Option<Promotion> {
        let years = self.structured_years();
        if years.is_empty() {
            return None;
        }
        let year = year.max(1);
        if semester < self.semesters_in_year(year) {
            return Some(Promotion::Advance {
                year,
                semester: semester + 1,
            });
        }
        Some(match years.into_iter().find(|y| *y > year) {
            Some(next) => Promotion::Advance {
                year: next,
                semester: 1,
            },
            None => Promotion::Completed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: i64,
    /// Display label, e.g. `2024-2025`.
    pub year_label: String,
    pub start_year: i32,
    pub end_year: i32,
    pub is_active: bool,
}

/// Reads the leading four-digit year of a batch or academic-year label
/// (`2023`, `2023-27`, `2023-2024`).
pub fn start_year_of(label: &str) -> Option<i32> {
    let digits: String = label.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}
