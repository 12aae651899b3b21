use crate::db::{now, Database};
use crate::error::ApiResult;
use actix_web::{web, HttpResponse};
use common::model::form::{Form, FormSpec};
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

/// `POST /api/forms`
pub async fn process(db: web::Data<Database>, payload: web::Json<FormSpec>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let form = create_form(&conn, &payload)?;
    info!("Created form {} ({}) with {} fields", form.id, form.name, form.fields.len());
    Ok(HttpResponse::Created().json(form))
}

/// Validates `spec` and stores it under a fresh public id.
pub fn create_form(conn: &Connection, spec: &FormSpec) -> ApiResult<Form> {
    let spec = spec.normalized();
    spec.validate()?;

    let id = Uuid::new_v4().to_string();
    let timestamp = now();
    conn.execute(
        "INSERT INTO forms (id, name, description, fields, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            id,
            spec.name,
            spec.description,
            serde_json::to_string(&spec.fields)?,
            spec.is_active,
            timestamp
        ],
    )?;

    Ok(Form {
        id,
        name: spec.name,
        description: spec.description,
        fields: spec.fields,
        is_active: spec.is_active,
        created_at: Some(timestamp.clone()),
        updated_at: Some(timestamp),
    })
}
