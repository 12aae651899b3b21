//! Row mapping and queries over `students`, shared by the student endpoints,
//! approval and the promotion job.

use crate::db::now;
use crate::error::{ApiError, ApiResult};
use common::model::student::{status, Student};
use common::requests::StudentFilter;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;

pub(crate) const STUDENT_COLUMNS: &str = "id, admission_number, student_name, father_name, gender, dob,
     adhar_no, caste, student_mobile, parent_mobile1, parent_mobile2, email, student_address,
     city_village, mandal_name, district, college, course, branch, batch, current_year,
     current_semester, fee_status, registration_status, scholar_status, certificates_status,
     student_status, mobile_verified, student_photo, remarks, extra, created_at, updated_at";

/// Form keys stored in their own text column.
const TEXT_COLUMNS: [&str; 21] = [
    "father_name",
    "gender",
    "dob",
    "adhar_no",
    "caste",
    "student_mobile",
    "parent_mobile1",
    "parent_mobile2",
    "email",
    "student_address",
    "city_village",
    "mandal_name",
    "district",
    "college",
    "course",
    "branch",
    "batch",
    "fee_status",
    "registration_status",
    "scholar_status",
    "remarks",
];

pub(crate) fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let extra: String = row.get(30)?;
    let extra = serde_json::from_str(&extra)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(30, Type::Text, Box::new(e)))?;
    Ok(Student {
        id: row.get(0)?,
        admission_number: row.get(1)?,
        student_name: row.get(2)?,
        father_name: row.get(3)?,
        gender: row.get(4)?,
        dob: row.get(5)?,
        adhar_no: row.get(6)?,
        caste: row.get(7)?,
        student_mobile: row.get(8)?,
        parent_mobile1: row.get(9)?,
        parent_mobile2: row.get(10)?,
        email: row.get(11)?,
        student_address: row.get(12)?,
        city_village: row.get(13)?,
        mandal_name: row.get(14)?,
        district: row.get(15)?,
        college: row.get(16)?,
        course: row.get(17)?,
        branch: row.get(18)?,
        batch: row.get(19)?,
        current_year: row.get(20)?,
        current_semester: row.get(21)?,
        fee_status: row.get(22)?,
        registration_status: row.get(23)?,
        scholar_status: row.get(24)?,
        certificates_status: row.get(25)?,
        student_status: row.get(26)?,
        mobile_verified: row.get(27)?,
        student_photo: row.get(28)?,
        remarks: row.get(29)?,
        extra,
        created_at: row.get(31)?,
        updated_at: row.get(32)?,
    })
}

pub(crate) fn not_found(admission_number: &str) -> ApiError {
    ApiError::NotFound(format!("student {admission_number} not found"))
}

pub fn find_student(conn: &Connection, admission_number: &str) -> ApiResult<Option<Student>> {
    Ok(conn
        .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE admission_number = ?1"),
            params![admission_number.trim()],
            student_from_row,
        )
        .optional()?)
}

pub fn get_student(conn: &Connection, admission_number: &str) -> ApiResult<Student> {
    find_student(conn, admission_number)?.ok_or_else(|| not_found(admission_number))
}

pub fn admission_number_taken(conn: &Connection, admission_number: &str) -> ApiResult<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM students WHERE admission_number = ?1)",
        params![admission_number],
        |row| row.get(0),
    )?)
}

/// Filtered listing, ordered by admission number. Every filter is optional.
pub fn list_students(conn: &Connection, filter: &StudentFilter) -> ApiResult<Vec<Student>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    if let Some(status) = present(&filter.status) {
        clauses.push("student_status = ?");
        values.push(Value::Text(status));
    }
    if let Some(course) = present(&filter.course) {
        clauses.push("course = ?");
        values.push(Value::Text(course));
    }
    if let Some(batch) = present(&filter.batch) {
        clauses.push("batch = ?");
        values.push(Value::Text(batch));
    }
    if let Some(search) = present(&filter.search) {
        clauses.push("(student_name LIKE ? OR admission_number LIKE ? OR student_mobile LIKE ?)");
        let pattern = format!("%{search}%");
        values.extend(std::iter::repeat_n(Value::Text(pattern), 3));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students{where_clause} ORDER BY admission_number"
    ))?;
    let students = stmt
        .query_map(params_from_iter(values), student_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

/// Builds a student from approved form answers. Keys that name a column fill it;
/// everything else lands in `extra`.
pub fn student_from_answers(admission_number: &str, answers: &HashMap<String, String>) -> ApiResult<Student> {
    let mut student = Student {
        admission_number: admission_number.to_string(),
        student_status: status::REGULAR.to_string(),
        ..Student::default()
    };

    for (key, value) in answers {
        let key = key.as_str();
        let value = value.trim();
        if value.is_empty() || key == "admission_number" {
            continue;
        }
        match key {
            "student_name" => student.student_name = value.to_string(),
            "current_year" | "current_semester" => match value.parse::<u8>() {
                Ok(n) if key == "current_year" => student.current_year = Some(n),
                Ok(n) => student.current_semester = Some(n),
                // e.g. a synthesized "2024-25" year range
                Err(_) => {
                    student.extra.insert(key.to_string(), value.to_string());
                }
            },
            column if TEXT_COLUMNS.contains(&column) => {
                *text_slot(&mut student, column) = Some(value.to_string());
            }
            _ => {
                student.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    if student.student_name.is_empty() {
        return Err(ApiError::MissingField("student_name".to_string()));
    }
    if student.student_mobile.is_none() {
        return Err(ApiError::MissingField("student_mobile".to_string()));
    }
    Ok(student)
}

fn text_slot<'a>(student: &'a mut Student, column: &str) -> &'a mut Option<String> {
    match column {
        "father_name" => &mut student.father_name,
        "gender" => &mut student.gender,
        "dob" => &mut student.dob,
        "adhar_no" => &mut student.adhar_no,
        "caste" => &mut student.caste,
        "student_mobile" => &mut student.student_mobile,
        "parent_mobile1" => &mut student.parent_mobile1,
        "parent_mobile2" => &mut student.parent_mobile2,
        "email" => &mut student.email,
        "student_address" => &mut student.student_address,
        "city_village" => &mut student.city_village,
        "mandal_name" => &mut student.mandal_name,
        "district" => &mut student.district,
        "college" => &mut student.college,
        "course" => &mut student.course,
        "branch" => &mut student.branch,
        "batch" => &mut student.batch,
        "fee_status" => &mut student.fee_status,
        "registration_status" => &mut student.registration_status,
        "scholar_status" => &mut student.scholar_status,
        _ => &mut student.remarks,
    }
}

/// Inserts `student` and returns its row id. Timestamps are set here.
pub fn insert_student(conn: &Connection, student: &Student) -> ApiResult<i64> {
    let timestamp = now();
    conn.execute(
        "INSERT INTO students (admission_number, student_name, father_name, gender, dob, adhar_no,
            caste, student_mobile, parent_mobile1, parent_mobile2, email, student_address,
            city_village, mandal_name, district, college, course, branch, batch, current_year,
            current_semester, fee_status, registration_status, scholar_status, certificates_status,
            student_status, mobile_verified, student_photo, remarks, extra, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
            ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?31)",
        params![
            student.admission_number,
            student.student_name,
            student.father_name,
            student.gender,
            student.dob,
            student.adhar_no,
            student.caste,
            student.student_mobile,
            student.parent_mobile1,
            student.parent_mobile2,
            student.email,
            student.student_address,
            student.city_village,
            student.mandal_name,
            student.district,
            student.college,
            student.course,
            student.branch,
            student.batch,
            student.current_year,
            student.current_semester,
            student.fee_status,
            student.registration_status,
            student.scholar_status,
            student.certificates_status,
            student.student_status,
            student.mobile_verified,
            student.student_photo,
            student.remarks,
            serde_json::to_string(&student.extra)?,
            timestamp
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
