use crate::db::{now, Database};
use crate::error::{ApiError, ApiResult};
use crate::services::students::store::{get_student, not_found};
use actix_web::{web, HttpResponse};
use common::model::documents::CertificatesStatus;
use common::model::student::{status, Student};
use common::requests::{MobileVerification, StatusChange, StudentUpdate};
use log::info;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("mobile regex"));

/// `PUT /api/students/{admission_number}`
pub async fn process(
    db: web::Data<Database>,
    admission_number: web::Path<String>,
    payload: web::Json<StudentUpdate>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let student = update_student(&conn, &admission_number, &payload)?;
    info!("Updated student {}", student.admission_number);
    Ok(HttpResponse::Ok().json(student))
}

/// `PUT /api/students/{admission_number}/status`
pub async fn process_status(
    db: web::Data<Database>,
    admission_number: web::Path<String>,
    payload: web::Json<StatusChange>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let student = set_student_status(&conn, &admission_number, &payload.student_status)?;
    info!(
        "Student {} is now {}",
        student.admission_number, student.student_status
    );
    Ok(HttpResponse::Ok().json(student))
}

/// `POST /api/students/{admission_number}/verify-mobile`
pub async fn process_verify_mobile(
    db: web::Data<Database>,
    admission_number: web::Path<String>,
    payload: web::Json<MobileVerification>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let student = verify_mobile(&conn, &admission_number, &payload.mobile)?;
    info!("Student {} verified mobile", student.admission_number);
    Ok(HttpResponse::Ok().json(student))
}

fn check_mobile(field: &str, value: &str) -> ApiResult<()> {
    if MOBILE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ApiError::InvalidField {
            field: field.to_string(),
            reason: "phone number must have 10 digits".to_string(),
        })
    }
}

/// Applies the provided fields of `patch`; absent fields keep their value.
pub fn update_student(conn: &Connection, admission_number: &str, patch: &StudentUpdate) -> ApiResult<Student> {
    let text = [
        ("student_name", &patch.student_name),
        ("father_name", &patch.father_name),
        ("gender", &patch.gender),
        ("dob", &patch.dob),
        ("student_mobile", &patch.student_mobile),
        ("parent_mobile1", &patch.parent_mobile1),
        ("parent_mobile2", &patch.parent_mobile2),
        ("email", &patch.email),
        ("student_address", &patch.student_address),
        ("city_village", &patch.city_village),
        ("mandal_name", &patch.mandal_name),
        ("district", &patch.district),
        ("college", &patch.college),
        ("course", &patch.course),
        ("branch", &patch.branch),
        ("batch", &patch.batch),
        ("fee_status", &patch.fee_status),
        ("registration_status", &patch.registration_status),
        ("scholar_status", &patch.scholar_status),
        ("certificates_status", &patch.certificates_status),
        ("remarks", &patch.remarks),
    ];

    let mut assignments: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    for (column, value) in text {
        let Some(value) = value.as_deref().map(str::trim) else {
            continue;
        };
        if column == "student_name" && value.is_empty() {
            return Err(ApiError::MissingField("student_name".to_string()));
        }
        if column.contains("mobile") && !value.is_empty() {
            check_mobile(column, value)?;
        }
        if column == "certificates_status" && !value.is_empty() && CertificatesStatus::parse(value).is_none() {
            return Err(ApiError::InvalidField {
                field: column.to_string(),
                reason: "must be Submitted or Pending".to_string(),
            });
        }
        assignments.push(format!("{column} = ?"));
        values.push(if value.is_empty() {
            Value::Null
        } else {
            Value::Text(value.to_string())
        });
    }
    for (column, value) in [
        ("current_year", patch.current_year),
        ("current_semester", patch.current_semester),
    ] {
        if let Some(value) = value {
            assignments.push(format!("{column} = ?"));
            values.push(Value::Integer(i64::from(value)));
        }
    }

    if assignments.is_empty() {
        return get_student(conn, admission_number);
    }
    assignments.push("updated_at = ?".to_string());
    values.push(Value::Text(now()));
    values.push(Value::Text(admission_number.trim().to_string()));

    let changed = conn.execute(
        &format!(
            "UPDATE students SET {} WHERE admission_number = ?",
            assignments.join(", ")
        ),
        params_from_iter(values),
    )?;
    if changed == 0 {
        return Err(not_found(admission_number));
    }
    get_student(conn, admission_number)
}

/// Soft lifecycle change; students are never deleted.
pub fn set_student_status(conn: &Connection, admission_number: &str, student_status: &str) -> ApiResult<Student> {
    let student_status = student_status.trim();
    if !status::is_known(student_status) {
        return Err(ApiError::InvalidField {
            field: "student_status".to_string(),
            reason: format!("expected one of {}", status::ALL.join(", ")),
        });
    }
    let changed = conn.execute(
        "UPDATE students SET student_status = ?1, updated_at = ?2 WHERE admission_number = ?3",
        params![student_status, now(), admission_number.trim()],
    )?;
    if changed == 0 {
        return Err(not_found(admission_number));
    }
    get_student(conn, admission_number)
}

pub fn verify_mobile(conn: &Connection, admission_number: &str, mobile: &str) -> ApiResult<Student> {
    let mobile = mobile.trim();
    check_mobile("mobile", mobile)?;
    let changed = conn.execute(
        "UPDATE students SET student_mobile = ?1, mobile_verified = 1, updated_at = ?2
         WHERE admission_number = ?3",
        params![mobile, now(), admission_number.trim()],
    )?;
    if changed == 0 {
        return Err(not_found(admission_number));
    }
    get_student(conn, admission_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::students::configure_routes;
    use crate::services::students::store::tests::seed_student;
    use actix_web::{http::StatusCode, test as web_test, App};
    use common::requests::ErrorBody;
    use serde_json::json;

    #[test]
    fn patch_only_touches_provided_fields() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        seed_student(&conn, "AD-001", "B.Tech", 1, 1);

        let patch = StudentUpdate {
            fee_status: Some("Paid".to_string()),
            current_semester: Some(2),
            remarks: Some(" ".to_string()),
            ..StudentUpdate::default()
        };
        let student = update_student(&conn, "AD-001", &patch).unwrap();
        assert_eq!(student.fee_status.as_deref(), Some("Paid"));
        assert_eq!(student.current_semester, Some(2));
        assert_eq!(student.current_year, Some(1));
        assert_eq!(student.remarks, None);
        assert_eq!(student.student_name, "Test Student");

        let bad = StudentUpdate {
            parent_mobile1: Some("12345".to_string()),
            ..StudentUpdate::default()
        };
        assert_eq!(
            update_student(&conn, "AD-001", &bad).unwrap_err().field(),
            Some("parent_mobile1")
        );
        assert!(matches!(
            update_student(&conn, "AD-404", &patch),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn certificates_status_must_be_known() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        seed_student(&conn, "AD-001", "B.Tech", 1, 1);

        let patch = |value: &str| StudentUpdate {
            certificates_status: Some(value.to_string()),
            ..StudentUpdate::default()
        };
        let student = update_student(&conn, "AD-001", &patch("Submitted")).unwrap();
        assert_eq!(student.certificates_status.as_deref(), Some("Submitted"));

        let err = update_student(&conn, "AD-001", &patch("Done")).unwrap_err();
        assert_eq!(err.field(), Some("certificates_status"));
        let student = get_student(&conn, "AD-001").unwrap();
        assert_eq!(student.certificates_status.as_deref(), Some("Submitted"));
    }

    #[test]
    fn status_must_be_a_known_lifecycle_value() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        seed_student(&conn, "AD-001", "B.Tech", 1, 1);

        let student = set_student_status(&conn, "AD-001", status::DETAINED).unwrap();
        assert_eq!(student.student_status, status::DETAINED);
        assert!(matches!(
            set_student_status(&conn, "AD-001", "Expelled"),
            Err(ApiError::InvalidField { .. })
        ));
    }

    #[actix_web::test]
    async fn verify_mobile_marks_student_verified() {
        let (_dir, db) = database();
        seed_student(&db.open().unwrap(), "AD-001", "B.Tech", 1, 1);
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = web_test::TestRequest::post()
            .uri("/api/students/AD-001/verify-mobile")
            .set_json(json!({"mobile": "98480"}))
            .to_request();
        let resp = web_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = web_test::read_body_json(resp).await;
        assert_eq!(body.field.as_deref(), Some("mobile"));

        let req = web_test::TestRequest::post()
            .uri("/api/students/AD-001/verify-mobile")
            .set_json(json!({"mobile": "9000012345"}))
            .to_request();
        let student: Student = web_test::call_and_read_body_json(&app, req).await;
        assert!(student.mobile_verified);
        assert_eq!(student.student_mobile.as_deref(), Some("9000012345"));
    }
}
