use super::get::{get_form, not_found};
use crate::db::Database;
use crate::error::ApiResult;
use actix_web::{web, HttpResponse};
use common::model::form::Form;
use rusqlite::Connection;

/// `GET /api/forms/public/{form_id}`
pub async fn process(db: web::Data<Database>, form_id: web::Path<String>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let form = get_public_form(&conn, &form_id)?;
    Ok(HttpResponse::Ok().json(form))
}

/// The form as the public sees it. Missing and inactive forms are both reported as
/// not found so a deactivated link reveals nothing.
pub fn get_public_form(conn: &Connection, form_id: &str) -> ApiResult<Form> {
    match get_form(conn, form_id)? {
        Some(form) if form.is_active => Ok(form.public_view()),
        _ => Err(not_found(form_id)),
    }
}
