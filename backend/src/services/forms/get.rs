use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use actix_web::{web, HttpResponse};
use common::model::form::{Form, FormField};
use rusqlite::{params, Connection, OptionalExtension};

/// `GET /api/forms/{form_id}`: admin view, inactive forms and disabled fields included.
pub async fn process(db: web::Data<Database>, form_id: web::Path<String>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let form = get_form(&conn, &form_id)?.ok_or_else(|| not_found(&form_id))?;
    Ok(HttpResponse::Ok().json(form))
}

pub(crate) fn not_found(form_id: &str) -> ApiError {
    ApiError::NotFound(format!("form {form_id} not found"))
}

/// Loads a form by id; `Ok(None)` when it does not exist.
pub fn get_form(conn: &Connection, form_id: &str) -> ApiResult<Option<Form>> {
    let row = conn
        .query_row(
            "SELECT id, name, description, fields, is_active, created_at, updated_at
             FROM forms WHERE id = ?1",
            params![form_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, name, description, fields_json, is_active, created_at, updated_at)) => {
            let fields: Vec<FormField> = serde_json::from_str(&fields_json)?;
            Ok(Some(Form {
                id,
                name,
                description,
                fields,
                is_active,
                created_at: Some(created_at),
                updated_at: Some(updated_at),
            }))
        }
        None => Ok(None),
    }
}
