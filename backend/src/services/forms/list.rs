use crate::db::Database;
use crate::error::ApiResult;
use actix_web::{web, HttpResponse};
use common::model::form::{FormField, FormSummary};
use rusqlite::Connection;

/// `GET /api/forms`
pub async fn process(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(list_forms(&conn)?))
}

pub fn list_forms(conn: &Connection) -> ApiResult<Vec<FormSummary>> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.name, f.is_active, f.fields,
                (SELECT COUNT(*) FROM submissions s WHERE s.form_id = f.id AND s.status = 'pending')
         FROM forms f ORDER BY f.created_at DESC, f.name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut forms = Vec::with_capacity(rows.len());
    for (id, name, is_active, fields_json, pending_submissions) in rows {
        let fields: Vec<FormField> = serde_json::from_str(&fields_json)?;
        forms.push(FormSummary {
            id,
            name,
            is_active,
            field_count: fields.len(),
            pending_submissions,
        });
    }
    Ok(forms)
}
