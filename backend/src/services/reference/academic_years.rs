use crate::db::{is_constraint_violation, Database};
use crate::error::{ApiError, ApiResult};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::reference::{start_year_of, AcademicYear};
use common::requests::NewAcademicYear;
use log::info;
use rusqlite::{params, Connection};

const API_PATH: &str = "/api/academic-years";

/// *   **`GET /public`**: active academic years, newest first.
/// *   **`POST /`**: create an academic year from a `2024-2025` style label.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/public", get().to(list_public))
        .route("", post().to(create))
}

async fn list_public(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_academic_years(&conn, true)?))
}

async fn create(
    db: web::Data<Database>,
    payload: web::Json<NewAcademicYear>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let year = create_academic_year(&conn, &payload.year_label)?;
    info!("Created academic year {}", year.year_label);
    Ok(HttpResponse::Created().json(year))
}

pub fn list_academic_years(conn: &Connection, active_only: bool) -> ApiResult<Vec<AcademicYear>> {
    let mut stmt = conn.prepare(
        "SELECT id, year_label, start_year, end_year, is_active FROM academic_years
         WHERE is_active = 1 OR ?1 = 0 ORDER BY start_year DESC",
    )?;
    let years = stmt
        .query_map(params![active_only], |row| {
            Ok(AcademicYear {
                id: row.get(0)?,
                year_label: row.get(1)?,
                start_year: row.get(2)?,
                end_year: row.get(3)?,
                is_active: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(years)
}

/// Parses `2024-2025` or `2024-25` into (start, end); a label spans exactly one year.
fn parse_label(label: &str) -> Option<(i32, i32)> {
    let start = start_year_of(label)?;
    let (_, end) = label.trim().split_once('-')?;
    let end = end.trim();
    let end: i32 = match end.len() {
        4 => end.parse().ok()?,
        2 => {
            let end = (start / 100) * 100 + end.parse::<i32>().ok()?;
            if end <= start { end + 100 } else { end }
        }
        _ => return None,
    };
    (end == start + 1).then_some((start, end))
}

pub fn create_academic_year(conn: &Connection, label: &str) -> ApiResult<AcademicYear> {
    let label = label.trim();
    let (start_year, end_year) = parse_label(label).ok_or_else(|| ApiError::InvalidField {
        field: "year_label".to_string(),
        reason: "expected a label like 2024-2025".to_string(),
    })?;
    let year_label = format!("{start_year}-{end_year}");
    conn.execute(
        "INSERT INTO academic_years (year_label, start_year, end_year) VALUES (?1, ?2, ?3)",
        params![year_label, start_year, end_year],
    )
    .map_err(|e| match e {
        e if is_constraint_violation(&e) => {
            ApiError::Conflict(format!("academic year {year_label} already exists"))
        }
        e => e.into(),
    })?;
    Ok(AcademicYear {
        id: conn.last_insert_rowid(),
        year_label,
        start_year,
        end_year,
        is_active: true,
    })
}
