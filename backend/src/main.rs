mod config;
mod db;
mod error;
mod job_controller;
mod services;

use crate::config::AppConfig;
use crate::db::Database;
use crate::job_controller::state::JobsState;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::fs;
use std::path::Path;
use std::process;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };
    ensure_parent(&config.database_path)?;
    fs::create_dir_all(&config.upload_dir)?;

    let database = Database::new(&config.database_path);
    match database.initialize() {
        Ok(applied) if applied.is_empty() => info!("Database {} is up to date", database.path().display()),
        Ok(applied) => info!("Database {} migrated: {:?}", database.path().display(), applied),
        Err(e) => {
            error!("Could not migrate {}: {}", database.path().display(), e);
            process::exit(1);
        }
    }

    let (jobs_state, rx) = JobsState::new();
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        job_controller::state::start_job_updater(updater_state, rx).await;
    });

    let bind = (config.host.clone(), config.port);
    info!("Server running at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(config.json_limit_bytes))
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(jobs_state.clone()))
            .service(services::forms::configure_routes())
            .service(services::submissions::configure_routes())
            .service(services::students::configure_routes())
            .service(services::reference::colleges::configure_routes())
            .service(services::reference::courses::configure_routes())
            .service(services::reference::academic_years::configure_routes())
            .service(services::documents::configure_routes())
            .service(services::promotion::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
