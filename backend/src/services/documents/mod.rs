//! # Document Requirements Service
//!
//! Which documents a registrant is expected to upload, per (course type, academic
//! stage). The course type is the `level` of a course (`UG`, `PG`, `Diploma`, ...).
//!
//! *   **`GET /api/documents/requirements?course_type=&academic_stage=`**: every
//!     configured pair, narrowed by whichever query keys are present.
//! *   **`PUT /api/documents/requirements`**: replaces the list of one pair. An empty
//!     list removes the pair.

use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use actix_web::web::{get, put, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::documents::DocumentRequirement;
use common::requests::RequirementQuery;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

const API_PATH: &str = "/api/documents";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/requirements", get().to(list))
        .route("/requirements", put().to(replace))
}

async fn list(db: web::Data<Database>, query: web::Query<RequirementQuery>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_requirements(&conn, &query)?))
}

async fn replace(
    db: web::Data<Database>,
    payload: web::Json<DocumentRequirement>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let stored = replace_requirement(&conn, &payload)?;
    info!(
        "Document requirements for {}/{} set to {:?}",
        stored.course_type, stored.academic_stage, stored.documents
    );
    Ok(HttpResponse::Ok().json(stored))
}

pub fn list_requirements(conn: &Connection, query: &RequirementQuery) -> ApiResult<Vec<DocumentRequirement>> {
    let mut stmt = conn.prepare(
        "SELECT course_type, academic_stage, documents FROM document_requirements
         WHERE (?1 IS NULL OR course_type = ?1) AND (?2 IS NULL OR academic_stage = ?2)
         ORDER BY course_type, academic_stage",
    )?;
    let rows = stmt
        .query_map(
            params![
                query.course_type.as_deref().map(str::trim),
                query.academic_stage.as_deref().map(str::trim)
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(course_type, academic_stage, documents)| {
            Ok(DocumentRequirement {
                course_type,
                academic_stage,
                documents: serde_json::from_str(&documents)?,
            })
        })
        .collect()
}

/// Documents currently required for a course type and stage; empty when unconfigured.
pub fn required_documents(conn: &Connection, course_type: &str, academic_stage: &str) -> ApiResult<Vec<String>> {
    let documents: Option<String> = conn
        .query_row(
            "SELECT documents FROM document_requirements
             WHERE course_type = ?1 AND academic_stage = ?2",
            params![course_type.trim(), academic_stage.trim()],
            |row| row.get(0),
        )
        .optional()?;
    match documents {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

pub fn replace_requirement(conn: &Connection, requirement: &DocumentRequirement) -> ApiResult<DocumentRequirement> {
    let course_type = requirement.course_type.trim();
    let academic_stage = requirement.academic_stage.trim();
    if course_type.is_empty() {
        return Err(ApiError::MissingField("course_type".to_string()));
    }
    if academic_stage.is_empty() {
        return Err(ApiError::MissingField("academic_stage".to_string()));
    }

    let mut documents: Vec<String> = Vec::new();
    for name in requirement.documents.iter().map(|d| d.trim()).filter(|d| !d.is_empty()) {
        if !documents.iter().any(|d| d.eq_ignore_ascii_case(name)) {
            documents.push(name.to_string());
        }
    }

    if documents.is_empty() {
        conn.execute(
            "DELETE FROM document_requirements WHERE course_type = ?1 AND academic_stage = ?2",
            params![course_type, academic_stage],
        )?;
    } else {
        conn.execute(
            "INSERT INTO document_requirements (course_type, academic_stage, documents)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(course_type, academic_stage) DO UPDATE SET documents = excluded.documents",
            params![course_type, academic_stage, serde_json::to_string(&documents)?],
        )?;
    }

    Ok(DocumentRequirement {
        course_type: course_type.to_string(),
        academic_stage: academic_stage.to_string(),
        documents,
    })
}
