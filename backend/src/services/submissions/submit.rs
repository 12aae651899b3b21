//! # Public Submission Intake
//!
//! `POST /api/submissions/{form_id}` with a `multipart/form-data` body:
//!
//! - text parts named by a field key of the form (other text parts are ignored);
//! - file parts named by the key of a `file`-type field (e.g. `student_photo`);
//! - document parts named `document_<Name>`;
//! - an `upload_documents` part (`"true"`/`"false"`); when `"false"` the document
//!   parts are dropped.
//!
//! Uploads are hashed while they stream and stored once as `<md5>.<ext>`, shared by
//! identical uploads. A request that ends up not storing a submission removes the
//! files it linked unless another request or a stored submission still uses them.

use crate::config::AppConfig;
use crate::db::{now, Database};
use crate::error::{ApiError, ApiResult};
use crate::services::documents::required_documents;
use crate::services::forms::public::get_public_form;
use crate::services::reference::courses::find_course_by_name;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use common::model::documents::{certificates_status, document_name_from_field, CertificatesStatus};
use common::model::form::{FieldType, Form};
use common::model::submission::{validate_submission, SubmissionDocument, SubmissionStatus};
use common::requests::SubmissionReceipt;
use futures_util::StreamExt;
use log::{info, warn};
use md5::Context;
use rusqlite::{params, Connection};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const UPLOAD_DOCUMENTS_PART: &str = "upload_documents";
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Stored paths claimed by requests still in flight, with the number of claims.
///
/// A path is claimed when an upload is linked to it and released once its request
/// finishes. A file is only removed when nothing claims it and no stored
/// submission references it.
static IN_FLIGHT: LazyLock<Mutex<HashMap<PathBuf, usize>>> = LazyLock::new(|| Mutex::new(HashMap::new()));

fn in_flight() -> MutexGuard<'static, HashMap<PathBuf, usize>> {
    IN_FLIGHT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An upload linked to a file in the upload directory by the current request.
struct StoredUpload {
    document: SubmissionDocument,
    is_document: bool,
}

impl StoredUpload {
    fn path(&self) -> &Path {
        Path::new(&self.document.stored_path)
    }
}

struct Intake {
    values: HashMap<String, String>,
    uploads: Vec<StoredUpload>,
    upload_documents: bool,
}

impl Intake {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            uploads: Vec::new(),
            upload_documents: true,
        }
    }

    /// Takes the document uploads out when the registrant switched documents off.
    fn take_dropped_documents(&mut self) -> Vec<StoredUpload> {
        if self.upload_documents {
            return Vec::new();
        }
        let (documents, kept): (Vec<_>, Vec<_>) = self.uploads.drain(..).partition(|u| u.is_document);
        self.uploads = kept;
        documents
    }

    fn file_fields(&self) -> HashSet<String> {
        self.uploads
            .iter()
            .filter(|u| !u.is_document)
            .map(|u| u.document.name.clone())
            .collect()
    }

    fn attached_documents(&self) -> HashSet<String> {
        self.uploads
            .iter()
            .filter(|u| u.is_document)
            .map(|u| u.document.name.clone())
            .collect()
    }
}

fn referenced(conn: &Connection, path: &Path) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM submission_documents WHERE stored_path = ?1)",
        params![path.to_string_lossy()],
        |row| row.get(0),
    )
}

/// Drops this request's claims. Unless `keep`, files left unclaimed and not
/// referenced by a stored submission are removed. Without a connection nothing is
/// removed.
fn release_uploads(conn: Option<&Connection>, uploads: Vec<StoredUpload>, keep: bool) {
    let mut claims = in_flight();
    for upload in &uploads {
        let path = upload.path();
        let remaining = match claims.get_mut(path) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                claims.remove(path);
                0
            }
            None => 0,
        };
        if keep || remaining > 0 {
            continue;
        }
        let Some(conn) = conn else {
            warn!("Leaving upload {} in place: no database to check", path.display());
            continue;
        };
        match referenced(conn, path) {
            Ok(true) => {}
            Ok(false) => {
                if let Err(e) = fs::remove_file(path) {
                    warn!("Could not remove upload {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("Leaving upload {} in place: {}", path.display(), e),
        }
    }
}

pub async fn process(
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    form_id: web::Path<String>,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    let form = {
        let conn = db.open()?;
        get_public_form(&conn, &form_id)?
    };

    let mut intake = Intake::new();
    let read = read_parts(&mut payload, &form, &config, &mut intake).await;
    let mut conn = match db.open() {
        Ok(conn) => conn,
        Err(e) => {
            release_uploads(None, intake.uploads, false);
            return Err(e.into());
        }
    };
    if let Err(err) = read {
        warn!("Rejected upload for form {}: {}", form.id, err);
        release_uploads(Some(&conn), intake.uploads, false);
        return Err(err);
    }
    let dropped = intake.take_dropped_documents();
    release_uploads(Some(&conn), dropped, false);

    let result = accept(&mut conn, &form, &intake);
    let file_count = intake.uploads.len();
    release_uploads(Some(&conn), intake.uploads, result.is_ok());

    let receipt = result?;
    info!(
        "Stored submission {} for form {} ({} files, certificates {})",
        receipt.submission_id,
        form.id,
        file_count,
        receipt.certificates_status.as_str()
    );
    Ok(HttpResponse::Created().json(receipt))
}

async fn read_parts(
    payload: &mut Multipart,
    form: &Form,
    config: &AppConfig,
    intake: &mut Intake,
) -> ApiResult<()> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()))
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));

        if name == UPLOAD_DOCUMENTS_PART {
            intake.upload_documents = read_text(&mut field, &name).await?.trim() != "false";
        } else if let Some(document) = document_name_from_field(&name) {
            let document = document.trim().to_string();
            if let Some(upload) = store_upload(&mut field, document, filename, config).await? {
                intake.uploads.push(StoredUpload {
                    is_document: true,
                    ..upload
                });
            }
        } else if form
            .field(&name)
            .is_some_and(|f| f.field_type == FieldType::File)
        {
            if let Some(upload) = store_upload(&mut field, name, filename, config).await? {
                intake.uploads.push(upload);
            }
        } else if filename.is_none() && form.field(&name).is_some() {
            let value = read_text(&mut field, &name).await?;
            intake.values.insert(name, value);
        } else {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
        }
    }
    Ok(())
}

async fn read_text(field: &mut Field, name: &str) -> ApiResult<String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
        if bytes.len() > MAX_TEXT_BYTES {
            return Err(ApiError::InvalidField {
                field: name.to_string(),
                reason: "value is too long".to_string(),
            });
        }
    }
    String::from_utf8(bytes).map_err(|_| ApiError::InvalidField {
        field: name.to_string(),
        reason: "value is not valid UTF-8".to_string(),
    })
}

/// Lower-cased alphanumeric extension of the client filename, `bin` otherwise.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

/// Streams one part to disk. `Ok(None)` for an empty part (no file chosen).
async fn store_upload(
    field: &mut Field,
    name: String,
    filename: Option<String>,
    config: &AppConfig,
) -> ApiResult<Option<StoredUpload>> {
    fs::create_dir_all(&config.upload_dir)?;
    let temp_path = config.upload_dir.join(format!("{}.part", Uuid::new_v4()));

    let (size, digest) = match write_part(field, &name, &temp_path, config.max_upload_bytes).await {
        Ok(written) => written,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };
    if size == 0 {
        fs::remove_file(&temp_path)?;
        return Ok(None);
    }

    let original_filename = filename.unwrap_or_default().trim().to_string();
    let stored: PathBuf = config
        .upload_dir
        .join(format!("{digest}.{}", extension_of(&original_filename)));
    {
        let mut claims = in_flight();
        let linked = if stored.exists() {
            fs::remove_file(&temp_path)
        } else {
            fs::rename(&temp_path, &stored)
        };
        if let Err(e) = linked {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        *claims.entry(stored.clone()).or_insert(0) += 1;
    }

    Ok(Some(StoredUpload {
        document: SubmissionDocument {
            name,
            original_filename,
            stored_path: stored.to_string_lossy().to_string(),
            size_bytes: size,
        },
        is_document: false,
    }))
}

async fn write_part(field: &mut Field, name: &str, path: &Path, max_bytes: u64) -> ApiResult<(u64, String)> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut hasher = Context::new();
    let mut size: u64 = 0;

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len() as u64;
        if size > max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "{name} exceeds the upload limit of {max_bytes} bytes"
            )));
        }
        hasher.consume(&chunk);
        writer.write_all(&chunk)?;
    }
    writer.flush()?;
    Ok((size, format!("{:x}", hasher.finalize())))
}

/// Documents required for the submitted course (via its level) and academic stage.
fn documents_required_for(conn: &Connection, values: &HashMap<String, String>) -> ApiResult<Vec<String>> {
    let value = |key: &str| values.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
    let (Some(course), Some(stage)) = (value("course"), value("academic_stage")) else {
        return Ok(Vec::new());
    };
    match find_course_by_name(conn, course)?.and_then(|c| c.level) {
        Some(course_type) => required_documents(conn, &course_type, stage),
        None => Ok(Vec::new()),
    }
}

fn accept(conn: &mut Connection, form: &Form, intake: &Intake) -> ApiResult<SubmissionReceipt> {
    validate_submission(form, &intake.values, &intake.file_fields())?;

    let required = documents_required_for(conn, &intake.values)?;
    let status = certificates_status(&required, &intake.attached_documents());
    let documents: Vec<SubmissionDocument> = intake.uploads.iter().map(|u| u.document.clone()).collect();
    let submission_id = store_submission(conn, &form.id, &intake.values, &documents, status)?;

    Ok(SubmissionReceipt {
        submission_id,
        certificates_status: status,
    })
}

/// Inserts a pending submission and its documents in one transaction.
pub fn store_submission(
    conn: &mut Connection,
    form_id: &str,
    data: &HashMap<String, String>,
    documents: &[SubmissionDocument],
    status: CertificatesStatus,
) -> ApiResult<String> {
    let id = Uuid::new_v4().to_string();
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO submissions (id, form_id, data, status, certificates_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            form_id,
            serde_json::to_string(data)?,
            SubmissionStatus::Pending.as_str(),
            status.as_str(),
            now()
        ],
    )?;
    for document in documents {
        tx.execute(
            "INSERT INTO submission_documents (submission_id, name, original_filename, stored_path, size_bytes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                document.name,
                document.original_filename,
                document.stored_path,
                document.size_bytes
            ],
        )?;
    }
    tx.commit()?;
    Ok(id)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::documents::replace_requirement;
    use crate::services::documents::tests::requirement;
    use crate::services::forms::create::create_form;
    use crate::services::reference::courses::create_course;
    use crate::services::reference::courses::tests::new_course;
    use crate::services::submissions::configure_routes;
    use crate::services::submissions::get::get_submission;
    use actix_web::{http::StatusCode, test as web_test, App};
    use common::model::form::FormSpec;
    use common::requests::ErrorBody;
    use serde_json::json;
    use tempfile::TempDir;

    const BOUNDARY: &str = "----registrar-test-boundary";

    #[derive(Clone, Copy)]
    pub enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    /// Content type header value and body of a `multipart/form-data` request.
    pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, content) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(content);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    /// Admission form: name and mobile required, course, academic stage, optional photo.
    pub fn seed_form(conn: &Connection) -> Form {
        let spec: FormSpec = serde_json::from_value(json!({
            "name": "Admissions 2025",
            "fields": [
                {"key": "admission_number", "label": "Admission No", "field_type": "text"},
                {"key": "student_name", "label": "Student Name", "field_type": "text", "required": true},
                {"key": "student_mobile", "label": "Mobile", "field_type": "tel", "required": true},
                {"key": "course", "label": "Course", "field_type": "select", "source": "courses"},
                {"key": "academic_stage", "label": "Stage", "field_type": "select", "options": ["Inter", "Diploma"]},
                {"key": "student_photo", "label": "Photo", "field_type": "file"}
            ]
        }))
        .unwrap();
        create_form(conn, &spec).unwrap()
    }

    pub fn seed_submission(conn: &mut Connection, form_id: &str, pairs: &[(&str, &str)]) -> String {
        let data: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        store_submission(conn, form_id, &data, &[], CertificatesStatus::Pending).unwrap()
    }

    fn config(dir: &TempDir, max_upload_bytes: u64) -> AppConfig {
        AppConfig {
            upload_dir: dir.path().join("uploads"),
            max_upload_bytes,
            ..AppConfig::default()
        }
    }

    fn stored_files(config: &AppConfig) -> Vec<String> {
        match fs::read_dir(&config.upload_dir) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn submission_count(db: &Database) -> i64 {
        db.open()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))
            .unwrap()
    }

    fn seed_requirements(conn: &Connection) {
        create_course(conn, &new_course("B.Tech", "UG", 4)).unwrap();
        replace_requirement(conn, &requirement("UG", "Inter", &["SSC Memo", "Aadhaar"])).unwrap();
    }

    fn post(form_id: &str, parts: &[Part<'_>]) -> web_test::TestRequest {
        let (content_type, body) = multipart(parts);
        web_test::TestRequest::post()
            .uri(&format!("/api/submissions/{form_id}"))
            .insert_header(("content-type", content_type))
            .set_payload(body)
    }

    macro_rules! app {
        ($db:expr, $config:expr) => {
            web_test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new($config.clone()))
                    .service(configure_routes()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn missing_required_field_is_named_and_nothing_is_stored() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = seed_form(&db.open().unwrap());
        let app = app!(db, config);

        let req = post(
            &form.id,
            &[
                Part::Text("student_name", "Ravi Kumar"),
                Part::File("document_Aadhaar", "aadhaar.pdf", b"%PDF-aadhaar"),
            ],
        );
        let resp = web_test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = web_test::read_body_json(resp).await;
        assert_eq!(body.field.as_deref(), Some("student_mobile"));
        assert_eq!(submission_count(&db), 0);
        assert!(stored_files(&config).is_empty());
    }

    #[actix_web::test]
    async fn certificates_status_follows_required_documents() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = {
            let conn = db.open().unwrap();
            seed_requirements(&conn);
            seed_form(&conn)
        };
        let app = app!(db, config);

        let mut parts = vec![
            Part::Text("student_name", "Ravi Kumar"),
            Part::Text("student_mobile", "9848012345"),
            Part::Text("course", "B.Tech"),
            Part::Text("academic_stage", "Inter"),
            Part::File("document_SSC Memo", "ssc.PDF", b"%PDF-ssc"),
        ];
        let resp = web_test::call_service(&app, post(&form.id, &parts).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let receipt: SubmissionReceipt = web_test::read_body_json(resp).await;
        assert_eq!(receipt.certificates_status, CertificatesStatus::Pending);

        parts.push(Part::File("document_Aadhaar", "aadhaar.jpg", b"jpeg-bytes"));
        parts.push(Part::File("student_photo", "me.png", b"png-bytes"));
        let resp = web_test::call_service(&app, post(&form.id, &parts).to_request()).await;
        let receipt: SubmissionReceipt = web_test::read_body_json(resp).await;
        assert_eq!(receipt.certificates_status, CertificatesStatus::Submitted);

        let stored = get_submission(&db.open().unwrap(), &receipt.submission_id).unwrap();
        assert_eq!(stored.documents.len(), 3);
        assert_eq!(stored.value("course"), Some("B.Tech"));
        let ssc = stored.documents.iter().find(|d| d.name == "SSC Memo").unwrap();
        let expected = format!("{:x}.pdf", md5::compute(b"%PDF-ssc"));
        assert!(ssc.stored_path.ends_with(&expected));
        assert_eq!(ssc.original_filename, "ssc.PDF");
        // identical SSC memos share one file
        assert_eq!(stored_files(&config).len(), 3);
    }

    #[actix_web::test]
    async fn switched_off_documents_are_dropped() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = {
            let conn = db.open().unwrap();
            seed_requirements(&conn);
            seed_form(&conn)
        };
        let app = app!(db, config);

        let req = post(
            &form.id,
            &[
                Part::Text("student_name", "Sita"),
                Part::Text("student_mobile", "9000012345"),
                Part::Text("course", "B.Tech"),
                Part::Text("academic_stage", "Inter"),
                Part::File("document_SSC Memo", "ssc.pdf", b"ssc"),
                Part::File("document_Aadhaar", "aadhaar.pdf", b"aadhaar"),
                Part::Text("upload_documents", "false"),
                Part::Text("unknown_key", "ignored"),
            ],
        );
        let receipt: SubmissionReceipt = web_test::call_and_read_body_json(&app, req.to_request()).await;
        assert_eq!(receipt.certificates_status, CertificatesStatus::Pending);
        let stored = get_submission(&db.open().unwrap(), &receipt.submission_id).unwrap();
        assert!(stored.documents.is_empty());
        assert!(!stored.data.contains_key("unknown_key"));
        assert!(stored_files(&config).is_empty());
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let (dir, db) = database();
        let config = config(&dir, 8);
        let form = seed_form(&db.open().unwrap());
        let app = app!(db, config);

        let req = post(
            &form.id,
            &[
                Part::Text("student_name", "Ravi"),
                Part::Text("student_mobile", "9848012345"),
                Part::File("student_photo", "me.png", b"far more than eight bytes"),
            ],
        );
        let resp = web_test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(submission_count(&db), 0);
        assert!(stored_files(&config).is_empty());
    }

    #[actix_web::test]
    async fn inactive_or_unknown_forms_are_not_found() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = seed_form(&db.open().unwrap());
        db.open()
            .unwrap()
            .execute("UPDATE forms SET is_active = 0", [])
            .unwrap();
        let app = app!(db, config);

        let parts = [Part::Text("student_name", "Ravi")];
        let resp = web_test::call_service(&app, post(&form.id, &parts).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = web_test::call_service(&app, post("no-such-form", &parts).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn dropped_document_keeps_identical_photo_file() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = seed_form(&db.open().unwrap());
        let app = app!(db, config);

        let req = post(
            &form.id,
            &[
                Part::Text("student_name", "Sita"),
                Part::Text("student_mobile", "9000012345"),
                Part::File("document_Aadhaar", "scan.png", b"same-scan"),
                Part::File("student_photo", "photo.png", b"same-scan"),
                Part::Text("upload_documents", "false"),
            ],
        );
        let receipt: SubmissionReceipt = web_test::call_and_read_body_json(&app, req.to_request()).await;
        let stored = get_submission(&db.open().unwrap(), &receipt.submission_id).unwrap();
        assert_eq!(stored.documents.len(), 1);
        assert_eq!(stored.documents[0].name, "student_photo");
        assert!(Path::new(&stored.documents[0].stored_path).exists());
    }

    #[actix_web::test]
    async fn failed_request_keeps_file_of_stored_submission() {
        let (dir, db) = database();
        let config = config(&dir, 1024);
        let form = seed_form(&db.open().unwrap());
        let app = app!(db, config);

        let accepted = [
            Part::Text("student_name", "Ravi"),
            Part::Text("student_mobile", "9848012345"),
            Part::File("student_photo", "me.png", b"png-bytes"),
        ];
        let receipt: SubmissionReceipt =
            web_test::call_and_read_body_json(&app, post(&form.id, &accepted).to_request()).await;

        // same photo, missing mobile
        let rejected = [
            Part::Text("student_name", "Ravi"),
            Part::File("student_photo", "me.png", b"png-bytes"),
        ];
        let resp = web_test::call_service(&app, post(&form.id, &rejected).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let stored = get_submission(&db.open().unwrap(), &receipt.submission_id).unwrap();
        assert!(Path::new(&stored.documents[0].stored_path).exists());
        assert_eq!(stored_files(&config).len(), 1);
    }

    #[test]
    fn extensions_are_normalized() {
        assert_eq!(extension_of("Scan.JPG"), "jpg");
        assert_eq!(extension_of("noext"), "bin");
        assert_eq!(extension_of("weird.p$f"), "bin");
    }
}
