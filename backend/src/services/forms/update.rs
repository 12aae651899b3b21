use super::get::{get_form, not_found};
use crate::db::{now, Database};
use crate::error::ApiResult;
use actix_web::{web, HttpResponse};
use common::model::form::{Form, FormSpec};
use log::info;
use rusqlite::{params, Connection};

/// `PUT /api/forms/{form_id}`
pub async fn process(
    db: web::Data<Database>,
    form_id: web::Path<String>,
    payload: web::Json<FormSpec>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let form = update_form(&conn, &form_id, &payload)?;
    info!("Updated form {} (active: {})", form.id, form.is_active);
    Ok(HttpResponse::Ok().json(form))
}

/// Replaces name, description, fields and activity of an existing form.
///
/// Submissions already received keep their raw answers; only new posts are
/// validated against the new definition.
pub fn update_form(conn: &Connection, form_id: &str, spec: &FormSpec) -> ApiResult<Form> {
    let spec = spec.normalized();
    spec.validate()?;

    let changed = conn.execute(
        "UPDATE forms SET name = ?1, description = ?2, fields = ?3, is_active = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            spec.name,
            spec.description,
            serde_json::to_string(&spec.fields)?,
            spec.is_active,
            now(),
            form_id
        ],
    )?;
    if changed == 0 {
        return Err(not_found(form_id));
    }
    get_form(conn, form_id)?.ok_or_else(|| not_found(form_id))
}
