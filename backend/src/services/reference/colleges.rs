use crate::db::{is_constraint_violation, Database};
use crate::error::{ApiError, ApiResult};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::reference::College;
use common::requests::NewCollege;
use log::info;
use rusqlite::{params, Connection};

const API_PATH: &str = "/api/colleges";

/// *   **`GET /public`**: active colleges.
/// *   **`POST /`**: create a college.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/public", get().to(list_public))
        .route("", post().to(create))
}

async fn list_public(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_colleges(&conn, true)?))
}

async fn create(db: web::Data<Database>, payload: web::Json<NewCollege>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let college = create_college(&conn, &payload)?;
    info!("Created college {} ({})", college.id, college.name);
    Ok(HttpResponse::Created().json(college))
}

pub fn list_colleges(conn: &Connection, active_only: bool) -> ApiResult<Vec<College>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, code, is_active FROM colleges
         WHERE is_active = 1 OR ?1 = 0 ORDER BY name",
    )?;
    let colleges = stmt
        .query_map(params![active_only], |row| {
            Ok(College {
                id: row.get(0)?,
                name: row.get(1)?,
                code: row.get(2)?,
                is_active: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(colleges)
}

pub fn create_college(conn: &Connection, new: &NewCollege) -> ApiResult<College> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingField("name".to_string()));
    }
    let code = new.code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    conn.execute(
        "INSERT INTO colleges (name, code) VALUES (?1, ?2)",
        params![name, code],
    )
    .map_err(|e| match e {
        e if is_constraint_violation(&e) => ApiError::Conflict(format!("college '{name}' already exists")),
        e => e.into(),
    })?;
    Ok(College {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        code: code.map(str::to_string),
        is_active: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;

    #[test]
    fn duplicate_college_is_a_conflict() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        let new = NewCollege {
            name: "Pydah College of Engineering".to_string(),
            code: Some("PCE".to_string()),
        };
        create_college(&conn, &new).unwrap();
        assert!(matches!(create_college(&conn, &new), Err(ApiError::Conflict(_))));
        conn.execute("UPDATE colleges SET is_active = 0", []).unwrap();
        assert!(list_colleges(&conn, true).unwrap().is_empty());
        assert_eq!(list_colleges(&conn, false).unwrap().len(), 1);
    }
}
