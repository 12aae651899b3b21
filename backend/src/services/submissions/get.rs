use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use actix_web::{web, HttpResponse};
use common::model::documents::CertificatesStatus;
use common::model::submission::{Submission, SubmissionDocument, SubmissionStatus};
use common::requests::SubmissionQuery;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// `GET /api/submissions/item/{id}`
pub async fn process(db: web::Data<Database>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(get_submission(&conn, &id)?))
}

/// `GET /api/submissions?status=pending`
pub async fn process_list(
    db: web::Data<Database>,
    query: web::Query<SubmissionQuery>,
) -> ApiResult<HttpResponse> {
    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(SubmissionStatus::parse(value).ok_or_else(|| ApiError::InvalidField {
            field: "status".to_string(),
            reason: format!("unknown status '{value}'"),
        })?),
        None => None,
    };
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_submissions(&conn, status)?))
}

const SUBMISSION_COLUMNS: &str =
    "id, form_id, data, status, certificates_status, student_id, review_note, created_at, reviewed_at";

struct SubmissionRow {
    id: String,
    form_id: String,
    data: String,
    status: String,
    certificates_status: String,
    student_id: Option<i64>,
    review_note: Option<String>,
    created_at: String,
    reviewed_at: Option<String>,
}

fn submission_row(row: &Row<'_>) -> rusqlite::Result<SubmissionRow> {
    Ok(SubmissionRow {
        id: row.get(0)?,
        form_id: row.get(1)?,
        data: row.get(2)?,
        status: row.get(3)?,
        certificates_status: row.get(4)?,
        student_id: row.get(5)?,
        review_note: row.get(6)?,
        created_at: row.get(7)?,
        reviewed_at: row.get(8)?,
    })
}

fn load_documents(conn: &Connection, submission_id: &str) -> ApiResult<Vec<SubmissionDocument>> {
    let mut stmt = conn.prepare(
        "SELECT name, original_filename, stored_path, size_bytes FROM submission_documents
         WHERE submission_id = ?1 ORDER BY id",
    )?;
    let documents = stmt
        .query_map(params![submission_id], |row| {
            Ok(SubmissionDocument {
                name: row.get(0)?,
                original_filename: row.get(1)?,
                stored_path: row.get(2)?,
                size_bytes: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents)
}

fn into_submission(conn: &Connection, row: SubmissionRow) -> ApiResult<Submission> {
    let status = SubmissionStatus::parse(&row.status)
        .ok_or_else(|| ApiError::Internal(format!("submission {} has status '{}'", row.id, row.status)))?;
    let certificates_status = CertificatesStatus::parse(&row.certificates_status).ok_or_else(|| {
        ApiError::Internal(format!(
            "submission {} has certificates status '{}'",
            row.id, row.certificates_status
        ))
    })?;
    Ok(Submission {
        documents: load_documents(conn, &row.id)?,
        data: serde_json::from_str(&row.data)?,
        id: row.id,
        form_id: row.form_id,
        status,
        certificates_status,
        student_id: row.student_id,
        review_note: row.review_note,
        created_at: row.created_at,
        reviewed_at: row.reviewed_at,
    })
}

pub fn get_submission(conn: &Connection, id: &str) -> ApiResult<Submission> {
    let row = conn
        .query_row(
            &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"),
            params![id],
            submission_row,
        )
        .optional()?
        .ok_or_else(|| ApiError::NotFound(format!("submission {id} not found")))?;
    into_submission(conn, row)
}

/// Newest first, optionally narrowed to one status.
pub fn list_submissions(conn: &Connection, status: Option<SubmissionStatus>) -> ApiResult<Vec<Submission>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions
         WHERE ?1 IS NULL OR status = ?1 ORDER BY created_at DESC, id"
    ))?;
    let rows = stmt
        .query_map(params![status.map(SubmissionStatus::as_str)], submission_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|row| into_submission(conn, row))
        .collect()
}
