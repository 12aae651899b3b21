use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::services::students::store::list_students;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::model::student::Student;
use common::requests::StudentFilter;
use log::info;
use rusqlite::Connection;

const HEADERS: [&str; 27] = [
    "admission_number",
    "student_name",
    "father_name",
    "gender",
    "dob",
    "student_mobile",
    "mobile_verified",
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
    "current_year",
    "current_semester",
    "fee_status",
    "registration_status",
    "scholar_status",
    "certificates_status",
    "student_status",
    "remarks",
    "created_at",
];

/// `GET /api/students/export`: same filter as the listing, as a CSV attachment.
pub async fn process(db: web::Data<Database>, filter: web::Query<StudentFilter>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let (count, body) = export_students_csv(&conn, &filter)?;
    info!("Exported {} students", count);
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("students.csv".to_string())],
        })
        .body(body))
}

fn record(student: &Student) -> Vec<String> {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: Option<u8>| v.map(|n| n.to_string()).unwrap_or_default();
    vec![
        student.admission_number.clone(),
        student.student_name.clone(),
        text(&student.father_name),
        text(&student.gender),
        text(&student.dob),
        text(&student.student_mobile),
        student.mobile_verified.to_string(),
        text(&student.parent_mobile1),
        text(&student.parent_mobile2),
        text(&student.email),
        text(&student.student_address),
        text(&student.city_village),
        text(&student.mandal_name),
        text(&student.district),
        text(&student.college),
        text(&student.course),
        text(&student.branch),
        text(&student.batch),
        number(student.current_year),
        number(student.current_semester),
        text(&student.fee_status),
        text(&student.registration_status),
        text(&student.scholar_status),
        text(&student.certificates_status),
        student.student_status.clone(),
        text(&student.remarks),
        student.created_at.clone(),
    ]
}

/// Returns the number of exported rows and the CSV bytes.
pub fn export_students_csv(conn: &Connection, filter: &StudentFilter) -> ApiResult<(usize, Vec<u8>)> {
    let students = list_students(conn, filter)?;
    let csv_error = |e: csv::Error| ApiError::Internal(format!("csv export: {e}"));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(csv_error)?;
    for student in &students {
        writer.write_record(record(student)).map_err(csv_error)?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("csv export: {e}")))?;
    Ok((students.len(), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::students::configure_routes;
    use crate::services::students::store::tests::seed_student;
    use actix_web::{http::header, test as web_test, App};

    #[test]
    fn rows_follow_the_header() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        seed_student(&conn, "AD-001", "B.Tech", 2, 1);
        let (count, body) = export_students_csv(&conn, &StudentFilter::default()).unwrap();
        assert_eq!(count, 1);

        let mut reader = csv::Reader::from_reader(body.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), HEADERS.len());
        let row = reader.records().next().unwrap().unwrap();
        let column = |name: &str| {
            let index = headers.iter().position(|h| h == name).unwrap();
            row.get(index).unwrap().to_string()
        };
        assert_eq!(column("admission_number"), "AD-001");
        assert_eq!(column("current_year"), "2");
        assert_eq!(column("student_status"), "Regular");
    }

    #[actix_web::test]
    async fn export_route_is_not_taken_for_an_admission_number() {
        let (_dir, db) = database();
        {
            let conn = db.open().unwrap();
            seed_student(&conn, "AD-001", "B.Tech", 1, 1);
            seed_student(&conn, "AD-002", "Diploma", 1, 1);
        }
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = web_test::TestRequest::get()
            .uri("/api/students/export?course=Diploma")
            .to_request();
        let resp = web_test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/csv"));
        let body = web_test::read_body(resp).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("AD-002"));
        assert!(!text.contains("AD-001"));
    }
}
