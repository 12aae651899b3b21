use crate::db::{is_constraint_violation, now, Database};
use crate::error::{ApiError, ApiResult};
use crate::services::students::store::{admission_number_taken, insert_student, student_from_answers};
use crate::services::submissions::credentials::{derive_password, hash_password, insert_credentials};
use crate::services::submissions::get::get_submission;
use actix_web::{web, HttpResponse};
use common::model::submission::{Submission, SubmissionStatus};
use common::requests::{ApprovalRequest, ApprovalResult, RejectRequest};
use log::{info, warn};
use rusqlite::{params, Connection};

/// Key of the `file` field whose upload becomes the student's photo.
const PHOTO_KEY: &str = "student_photo";

/// `POST /api/submissions/item/{id}/approve`
///
/// Hashing runs on the blocking pool together with the database work.
pub async fn approve(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<ApprovalRequest>,
) -> ApiResult<HttpResponse> {
    let db = db.get_ref().clone();
    let id = id.into_inner();
    let request = payload.into_inner();

    let submission_id = id.clone();
    let result = web::block(move || {
        let mut conn = db.open()?;
        approve_submission(&mut conn, &submission_id, &request)
    })
    .await?;

    match result {
        Ok(approval) => {
            info!(
                "Approved submission {} as student {} ({})",
                id, approval.student_id, approval.admission_number
            );
            Ok(HttpResponse::Ok().json(approval))
        }
        Err(err) => {
            warn!("Approval of submission {} failed: {}", id, err);
            Err(err)
        }
    }
}

/// `POST /api/submissions/item/{id}/reject`
pub async fn reject(
    db: web::Data<Database>,
    id: web::Path<String>,
    payload: web::Json<RejectRequest>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let submission = reject_submission(&conn, &id, payload.note.as_deref())?;
    info!("Rejected submission {}", submission.id);
    Ok(HttpResponse::Ok().json(submission))
}

fn ensure_pending(submission: &Submission) -> ApiResult<()> {
    if submission.status == SubmissionStatus::Pending {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "submission {} is already {}",
            submission.id, submission.status
        )))
    }
}

/// Turns a pending submission into a student with login credentials.
///
/// The student row, its credentials and the status change commit together.
pub fn approve_submission(
    conn: &mut Connection,
    id: &str,
    request: &ApprovalRequest,
) -> ApiResult<ApprovalResult> {
    let submission = get_submission(conn, id)?;
    ensure_pending(&submission)?;

    let mut answers = submission.data.clone();
    for (key, value) in &request.overrides {
        answers.insert(key.trim().to_string(), value.clone());
    }
    let admission_number = request
        .admission_number
        .as_deref()
        .or_else(|| answers.get("admission_number").map(String::as_str))
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::MissingField("admission_number".to_string()))?
        .to_string();

    let mut student = student_from_answers(&admission_number, &answers)?;
    student.certificates_status = Some(submission.certificates_status.as_str().to_string());
    student.student_photo = submission
        .documents
        .iter()
        .find(|d| d.name == PHOTO_KEY)
        .map(|d| d.stored_path.clone());

    let password = derive_password(
        &student.student_name,
        student.student_mobile.as_deref().unwrap_or_default(),
    );
    let password_hash = hash_password(&password)?;

    let tx = conn.transaction()?;
    if admission_number_taken(&tx, &admission_number)? {
        return Err(ApiError::Conflict(format!(
            "admission number {admission_number} is already in use"
        )));
    }
    let student_id = insert_student(&tx, &student).map_err(|e| match e {
        ApiError::Database(e) if is_constraint_violation(&e) => {
            ApiError::Conflict(format!("admission number {admission_number} is already in use"))
        }
        e => e,
    })?;
    insert_credentials(&tx, student_id, &admission_number, &password_hash)?;
    let changed = tx.execute(
        "UPDATE submissions SET status = ?1, student_id = ?2, reviewed_at = ?3
         WHERE id = ?4 AND status = ?5",
        params![
            SubmissionStatus::Approved.as_str(),
            student_id,
            now(),
            id,
            SubmissionStatus::Pending.as_str()
        ],
    )?;
    if changed != 1 {
        return Err(ApiError::Conflict(format!("submission {id} is no longer pending")));
    }
    tx.commit()?;

    Ok(ApprovalResult {
        student_id,
        username: admission_number.clone(),
        admission_number,
        password,
    })
}

pub fn reject_submission(conn: &Connection, id: &str, note: Option<&str>) -> ApiResult<Submission> {
    let submission = get_submission(conn, id)?;
    ensure_pending(&submission)?;
    mark_rejected(conn, id, note)?;
    get_submission(conn, id)
}

/// Rejects `id` only while it is still pending; a concurrent approval wins.
fn mark_rejected(conn: &Connection, id: &str, note: Option<&str>) -> ApiResult<()> {
    let note = note.map(str::trim).filter(|n| !n.is_empty());
    let changed = conn.execute(
        "UPDATE submissions SET status = ?1, review_note = ?2, reviewed_at = ?3
         WHERE id = ?4 AND status = ?5",
        params![
            SubmissionStatus::Rejected.as_str(),
            note,
            now(),
            id,
            SubmissionStatus::Pending.as_str()
        ],
    )?;
    if changed != 1 {
        return Err(ApiError::Conflict(format!("submission {id} is no longer pending")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::students::store::get_student;
    use crate::services::submissions::configure_routes;
    use crate::services::submissions::credentials::verify_password;
    use crate::services::submissions::submit::tests::{seed_form, seed_submission};
    use actix_web::{http::StatusCode, test as web_test, App};
    use common::requests::ErrorBody;
    use serde_json::json;
    use std::collections::HashMap;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    const RAVI: [(&str, &str); 4] = [
        ("admission_number", "AD-2025-001"),
        ("student_name", "Ravi Kumar"),
        ("student_mobile", "9848012345"),
        ("blood_group", "B+"),
    ];

    #[test]
    fn rejection_does_not_overwrite_a_decided_submission() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        let form = seed_form(&conn);
        let id = seed_submission(&mut conn, &form.id, &RAVI);
        // approved after the pending check already passed
        conn.execute("UPDATE submissions SET status = 'approved' WHERE id = ?1", [&id])
            .unwrap();

        let err = mark_rejected(&conn, &id, Some("duplicate")).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let stored = get_submission(&conn, &id).unwrap();
        assert_eq!(stored.status, SubmissionStatus::Approved);
        assert_eq!(stored.review_note, None);
    }

    #[test]
    fn approval_creates_one_student_with_verifiable_credentials() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        let form = seed_form(&conn);
        let id = seed_submission(&mut conn, &form.id, &RAVI);

        let result = approve_submission(&mut conn, &id, &ApprovalRequest::default()).unwrap();
        assert_eq!(result.admission_number, "AD-2025-001");
        assert_eq!(result.username, "AD-2025-001");
        assert_eq!(result.password, "RAVI2345");
        assert_eq!(count(&conn, "students"), 1);
        assert_eq!(count(&conn, "student_credentials"), 1);

        let hash: String = conn
            .query_row(
                "SELECT password_hash FROM student_credentials WHERE student_id = ?1",
                [result.student_id],
                |row| row.get(0),
            )
            .unwrap();
        assert!(verify_password(&result.password, &hash));

        let student = get_student(&conn, "AD-2025-001").unwrap();
        assert_eq!(student.extra.get("blood_group").map(String::as_str), Some("B+"));
        assert_eq!(student.certificates_status.as_deref(), Some("Pending"));

        let submission = get_submission(&conn, &id).unwrap();
        assert_eq!(submission.status, SubmissionStatus::Approved);
        assert_eq!(submission.student_id, Some(result.student_id));
        assert!(submission.reviewed_at.is_some());

        assert!(matches!(
            approve_submission(&mut conn, &id, &ApprovalRequest::default()),
            Err(ApiError::Conflict(_))
        ));
        assert_eq!(count(&conn, "students"), 1);
    }

    #[test]
    fn duplicate_admission_number_leaves_everything_untouched() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        let form = seed_form(&conn);
        let first = seed_submission(&mut conn, &form.id, &RAVI);
        let second = seed_submission(
            &mut conn,
            &form.id,
            &[("student_name", "Sita"), ("student_mobile", "9000012345")],
        );
        approve_submission(&mut conn, &first, &ApprovalRequest::default()).unwrap();

        let request = ApprovalRequest {
            admission_number: Some(" AD-2025-001 ".to_string()),
            overrides: HashMap::new(),
        };
        assert!(matches!(
            approve_submission(&mut conn, &second, &request),
            Err(ApiError::Conflict(_))
        ));
        assert_eq!(count(&conn, "students"), 1);
        assert_eq!(count(&conn, "student_credentials"), 1);
        assert_eq!(
            get_submission(&conn, &second).unwrap().status,
            SubmissionStatus::Pending
        );
    }

    #[test]
    fn overrides_win_over_submitted_answers() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        let form = seed_form(&conn);
        let id = seed_submission(
            &mut conn,
            &form.id,
            &[("student_name", "ravi"), ("student_mobile", "9848012345")],
        );

        let err = approve_submission(&mut conn, &id, &ApprovalRequest::default()).unwrap_err();
        assert_eq!(err.field(), Some("admission_number"));

        let request = ApprovalRequest {
            admission_number: Some("AD-7".to_string()),
            overrides: HashMap::from([("student_name".to_string(), "Ravi Teja".to_string())]),
        };
        approve_submission(&mut conn, &id, &request).unwrap();
        assert_eq!(get_student(&conn, "AD-7").unwrap().student_name, "Ravi Teja");
    }

    #[actix_web::test]
    async fn rejected_submissions_cannot_be_approved() {
        let (_dir, db) = database();
        let id = {
            let mut conn = db.open().unwrap();
            let form = seed_form(&conn);
            seed_submission(&mut conn, &form.id, &RAVI)
        };
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = web_test::TestRequest::post()
            .uri(&format!("/api/submissions/item/{id}/reject"))
            .set_json(json!({"note": "duplicate application"}))
            .to_request();
        let rejected: Submission = web_test::call_and_read_body_json(&app, req).await;
        assert_eq!(rejected.status, SubmissionStatus::Rejected);
        assert_eq!(rejected.review_note.as_deref(), Some("duplicate application"));

        let req = web_test::TestRequest::post()
            .uri(&format!("/api/submissions/item/{id}/approve"))
            .set_json(json!({}))
            .to_request();
        let resp = web_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: ErrorBody = web_test::read_body_json(resp).await;
        assert!(body.error.contains("rejected"));

        let req = web_test::TestRequest::get()
            .uri("/api/submissions?status=pending")
            .to_request();
        let pending: Vec<Submission> = web_test::call_and_read_body_json(&app, req).await;
        assert!(pending.is_empty());

        let req = web_test::TestRequest::get()
            .uri("/api/submissions?status=archived")
            .to_request();
        assert_eq!(web_test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
