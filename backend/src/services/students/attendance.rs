use crate::db::{now, Database};
use crate::error::{ApiError, ApiResult};
use crate::services::students::store::get_student;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use common::model::attendance::{AttendanceRecord, AttendanceStatus};
use common::requests::AttendanceMark;
use log::{info, warn};
use rusqlite::{params, Connection};

/// `GET /api/students/{admission_number}/attendance`
pub async fn list(db: web::Data<Database>, admission_number: web::Path<String>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_attendance(&conn, &admission_number)?))
}

/// `POST /api/students/{admission_number}/attendance`
pub async fn mark(
    db: web::Data<Database>,
    admission_number: web::Path<String>,
    payload: web::Json<AttendanceMark>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let record = mark_attendance(&conn, &admission_number, &payload.date, payload.status)?;
    info!(
        "Marked {} {} on {}",
        record.admission_number,
        record.status.as_str(),
        record.date
    );
    Ok(HttpResponse::Ok().json(record))
}

/// Records the status for one day; marking the same day again replaces it.
pub fn mark_attendance(
    conn: &Connection,
    admission_number: &str,
    date: &str,
    status: AttendanceStatus,
) -> ApiResult<AttendanceRecord> {
    let date = date.trim();
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ApiError::InvalidField {
            field: "date".to_string(),
            reason: "date must be YYYY-MM-DD".to_string(),
        });
    }
    let student = get_student(conn, admission_number)?;
    let marked_at = now();
    conn.execute(
        "INSERT INTO attendance (student_id, date, status, marked_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(student_id, date) DO UPDATE SET status = excluded.status, marked_at = excluded.marked_at",
        params![student.id, date, status.as_str(), marked_at],
    )?;
    Ok(AttendanceRecord {
        admission_number: student.admission_number,
        date: date.to_string(),
        status,
        marked_at,
    })
}

/// Attendance of one student, newest day first.
pub fn list_attendance(conn: &Connection, admission_number: &str) -> ApiResult<Vec<AttendanceRecord>> {
    let student = get_student(conn, admission_number)?;
    let mut stmt = conn.prepare(
        "SELECT date, status, marked_at FROM attendance WHERE student_id = ?1 ORDER BY date DESC",
    )?;
    let rows = stmt
        .query_map(params![student.id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(rows.len());
    for (date, status, marked_at) in rows {
        match AttendanceStatus::parse(&status) {
            Some(status) => records.push(AttendanceRecord {
                admission_number: student.admission_number.clone(),
                date,
                status,
                marked_at,
            }),
            None => warn!(
                "Skipping attendance of {} on {} with unknown status '{}'",
                student.admission_number, date, status
            ),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::students::configure_routes;
    use crate::services::students::store::tests::seed_student;
    use actix_web::{http::StatusCode, test as web_test, App};
    use serde_json::json;

    #[test]
    fn remarking_a_day_replaces_the_status() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        seed_student(&conn, "AD-001", "B.Tech", 1, 1);

        mark_attendance(&conn, "AD-001", "2025-01-06", AttendanceStatus::Absent).unwrap();
        mark_attendance(&conn, "AD-001", "2025-01-07", AttendanceStatus::Present).unwrap();
        mark_attendance(&conn, "AD-001", "2025-01-06", AttendanceStatus::Leave).unwrap();

        let records = list_attendance(&conn, "AD-001").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2025-01-07");
        assert_eq!(records[1].status, AttendanceStatus::Leave);
    }

    #[actix_web::test]
    async fn bad_dates_and_unknown_students_are_rejected() {
        let (_dir, db) = database();
        seed_student(&db.open().unwrap(), "AD-001", "B.Tech", 1, 1);
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = web_test::TestRequest::post()
            .uri("/api/students/AD-001/attendance")
            .set_json(json!({"date": "2025-02-30", "status": "present"}))
            .to_request();
        assert_eq!(web_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = web_test::TestRequest::post()
            .uri("/api/students/AD-404/attendance")
            .set_json(json!({"date": "2025-02-03", "status": "present"}))
            .to_request();
        assert_eq!(web_test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = web_test::TestRequest::post()
            .uri("/api/students/AD-001/attendance")
            .set_json(json!({"date": "2025-02-03", "status": "present"}))
            .to_request();
        assert_eq!(web_test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = web_test::TestRequest::get()
            .uri("/api/students/AD-001/attendance")
            .to_request();
        let records: Vec<AttendanceRecord> = web_test::call_and_read_body_json(&app, req).await;
        assert_eq!(records.len(), 1);
    }
}
