//! # Promotion Job
//!
//! ## Workflow:
//!
//! 1.  **HTTP Request**: `process` receives an optional `course`/`batch` filter.
//! 2.  **Job Scheduling**: `schedule_promotion_job` registers a `Pending` job, returns
//!     its id and spawns a Tokio task that owns the job's lifecycle.
//! 3.  **Background Processing**: the task runs `promote_blocking` through
//!     `spawn_blocking`; a listener turns its `PromotionUpdate`s into `JobUpdate`s for
//!     the central job updater.
//! 4.  **Promotion**: `run_promotion` walks the matching `Regular` students in chunks
//!     of `promotion_batch_size`, one transaction per chunk. A student moves to the
//!     next semester of the year, else to semester 1 of the next year; past the final
//!     semester the student becomes `Completed`. Students whose course is unknown, or
//!     whose year/semester is not set, are skipped and counted.

use crate::config::AppConfig;
use crate::db::{now, Database};
use crate::error::ApiResult;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::reference::courses::load_courses;
use actix_web::{web, HttpResponse};
use common::jobs::JobStatus;
use common::model::reference::{Course, Promotion};
use common::model::student::status;
use common::requests::{JobStarted, StartPromotionRequest};
use log::{error, info};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug)]
pub enum PromotionUpdate {
    Job(JobStatus),
    Chunk { done: usize, total: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PromotionSummary {
    pub promoted: usize,
    pub completed: usize,
    pub skipped: usize,
}

impl fmt::Display for PromotionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "promoted {}, completed {}, skipped {} (unknown course or position)",
            self.promoted, self.completed, self.skipped
        )
    }
}

/// `POST /api/promotion/start`
pub(crate) async fn process(
    state: web::Data<JobsState>,
    db: web::Data<Database>,
    config: web::Data<AppConfig>,
    payload: web::Json<StartPromotionRequest>,
) -> ApiResult<HttpResponse> {
    let job_id = schedule_promotion_job(
        &state,
        db.get_ref().clone(),
        config.promotion_batch_size,
        payload.into_inner(),
    )
    .await;
    Ok(HttpResponse::Accepted().json(JobStarted { job_id }))
}

async fn schedule_promotion_job(
    state: &JobsState,
    db: Database,
    batch_size: usize,
    request: StartPromotionRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state.register(&job_id).await;
    info!(
        "Scheduled promotion job {} (course {:?}, batch {:?})",
        job_id, request.course, request.batch
    );

    let tx = state.tx.clone();
    let job_id_for_task = job_id.clone();
    tokio::spawn(async move {
        let (promotion_tx, mut promotion_rx) = mpsc::channel::<PromotionUpdate>(100);

        let listener_tx = tx.clone();
        let job_id_for_listener = job_id_for_task.clone();
        let listener = tokio::spawn(async move {
            while let Some(update) = promotion_rx.recv().await {
                let status = match update {
                    PromotionUpdate::Job(status) => status,
                    PromotionUpdate::Chunk { done, total } => JobStatus::InProgress(percent(done, total)),
                };
                let _ = listener_tx
                    .send(JobUpdate {
                        job_id: job_id_for_listener.clone(),
                        status,
                    })
                    .await;
            }
        });

        let handle = tokio::task::spawn_blocking(move || promote_blocking(promotion_tx, &db, batch_size, &request));
        let result = handle.await;
        // progress must not overwrite the final status
        let _ = listener.await;

        let status = match result {
            Ok(Ok(summary)) => {
                info!("Promotion job {} finished: {}", job_id_for_task, summary);
                JobStatus::Completed(summary.to_string())
            }
            Ok(Err(e)) => {
                error!("Promotion job {} failed: {}", job_id_for_task, e);
                JobStatus::Failed(e)
            }
            Err(e) => {
                error!("Promotion job {} panicked: {}", job_id_for_task, e);
                JobStatus::Failed(format!("Task join error: {e}"))
            }
        };
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_for_task,
                status,
            })
            .await;
    });

    job_id
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        100
    } else {
        (done * 100 / total).min(100) as u32
    }
}

/// Runs on the blocking pool; progress goes out through `tx`.
fn promote_blocking(
    tx: mpsc::Sender<PromotionUpdate>,
    db: &Database,
    batch_size: usize,
    request: &StartPromotionRequest,
) -> Result<PromotionSummary, String> {
    let _ = tx.blocking_send(PromotionUpdate::Job(JobStatus::InProgress(0)));
    let mut conn = db.open().map_err(|e| e.to_string())?;
    run_promotion(&mut conn, request, batch_size, |done, total| {
        let _ = tx.blocking_send(PromotionUpdate::Chunk { done, total });
    })
    .map_err(|e| e.to_string())
}

struct Candidate {
    id: i64,
    course: Option<String>,
    year: Option<u8>,
    semester: Option<u8>,
}

fn candidates(conn: &Connection, request: &StartPromotionRequest) -> ApiResult<Vec<Candidate>> {
    let filter = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let mut stmt = conn.prepare(
        "SELECT id, course, current_year, current_semester FROM students
         WHERE student_status = ?1 AND (?2 IS NULL OR course = ?2) AND (?3 IS NULL OR batch = ?3)
         ORDER BY id",
    )?;
    let rows = stmt
        .query_map(
            params![status::REGULAR, filter(&request.course), filter(&request.batch)],
            |row| {
                Ok(Candidate {
                    id: row.get(0)?,
                    course: row.get(1)?,
                    year: row.get(2)?,
                    semester: row.get(3)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Promotes the matching students, committing one chunk at a time. `progress` is
/// called after every committed chunk with (students done, students total).
pub fn run_promotion(
    conn: &mut Connection,
    request: &StartPromotionRequest,
    batch_size: usize,
    mut progress: impl FnMut(usize, usize),
) -> ApiResult<PromotionSummary> {
    let courses: HashMap<String, Course> = load_courses(conn, false)?
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();
    let students = candidates(conn, request)?;
    let total = students.len();
    let mut summary = PromotionSummary::default();
    let mut done = 0;

    for chunk in students.chunks(batch_size.max(1)) {
        let tx = conn.transaction()?;
        for student in chunk {
            let course = student.course.as_deref().and_then(|name| courses.get(name));
            let next = match (course, student.year, student.semester) {
                (Some(course), Some(year), Some(semester)) => course.next_position(year, semester),
                _ => None,
            };
            match next {
                Some(Promotion::Advance { year, semester }) => {
                    tx.execute(
                        "UPDATE students SET current_year = ?1, current_semester = ?2, updated_at = ?3
                         WHERE id = ?4",
                        params![year, semester, now(), student.id],
                    )?;
                    summary.promoted += 1;
                }
                Some(Promotion::Completed) => {
                    tx.execute(
                        "UPDATE students SET student_status = ?1, updated_at = ?2 WHERE id = ?3",
                        params![status::COMPLETED, now(), student.id],
                    )?;
                    summary.completed += 1;
                }
                None => summary.skipped += 1,
            }
        }
        tx.commit()?;
        done += chunk.len();
        progress(done, total);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::promotion::configure_routes;
    use crate::services::reference::courses::create_course;
    use crate::services::reference::courses::tests::new_course;
    use crate::services::students::store::get_student;
    use crate::services::students::store::tests::seed_student;
    use crate::job_controller::state::start_job_updater;
    use actix_web::{http::StatusCode, test as web_test, App};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn promotes_advances_and_completes() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        create_course(&conn, &new_course("B.Tech", "UG", 4)).unwrap();
        seed_student(&conn, "AD-1", "B.Tech", 1, 1);
        seed_student(&conn, "AD-2", "B.Tech", 1, 2);
        seed_student(&conn, "AD-3", "B.Tech", 4, 2);
        seed_student(&conn, "AD-4", "Unknown", 1, 1);
        seed_student(&conn, "AD-5", "B.Tech", 2, 1);
        conn.execute(
            "UPDATE students SET student_status = 'Detained' WHERE admission_number = 'AD-5'",
            [],
        )
        .unwrap();

        let mut calls = Vec::new();
        let summary = run_promotion(&mut conn, &StartPromotionRequest::default(), 2, |done, total| {
            calls.push((done, total))
        })
        .unwrap();

        assert_eq!(
            summary,
            PromotionSummary {
                promoted: 2,
                completed: 1,
                skipped: 1
            }
        );
        assert_eq!(calls, vec![(2, 4), (4, 4)]);

        let position = |admission: &str| {
            let s = get_student(&conn, admission).unwrap();
            (s.current_year, s.current_semester, s.student_status)
        };
        assert_eq!(position("AD-1"), (Some(1), Some(2), "Regular".to_string()));
        assert_eq!(position("AD-2"), (Some(2), Some(1), "Regular".to_string()));
        assert_eq!(position("AD-3").2, "Completed");
        assert_eq!(position("AD-4"), (Some(1), Some(1), "Regular".to_string()));
        assert_eq!(position("AD-5"), (Some(2), Some(1), "Detained".to_string()));
    }

    #[test]
    fn course_filter_limits_the_run() {
        let (_dir, db) = database();
        let mut conn = db.open().unwrap();
        create_course(&conn, &new_course("B.Tech", "UG", 4)).unwrap();
        create_course(&conn, &new_course("Diploma", "Diploma", 3)).unwrap();
        seed_student(&conn, "AD-1", "B.Tech", 1, 1);
        seed_student(&conn, "AD-2", "Diploma", 1, 1);

        let request = StartPromotionRequest {
            course: Some("Diploma".to_string()),
            batch: None,
        };
        let summary = run_promotion(&mut conn, &request, 50, |_, _| {}).unwrap();
        assert_eq!(summary.promoted, 1);
        assert_eq!(get_student(&conn, "AD-1").unwrap().current_semester, Some(1));
        assert_eq!(get_student(&conn, "AD-2").unwrap().current_semester, Some(2));
    }

    #[actix_web::test]
    async fn job_reports_completion_with_summary() {
        let (dir, db) = database();
        {
            let conn = db.open().unwrap();
            create_course(&conn, &new_course("B.Tech", "UG", 4)).unwrap();
            seed_student(&conn, "AD-1", "B.Tech", 1, 1);
        }
        let (state, rx) = JobsState::new();
        actix_web::rt::spawn(start_job_updater(state.clone(), rx));
        let config = AppConfig {
            upload_dir: dir.path().join("uploads"),
            ..AppConfig::default()
        };
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .app_data(web::Data::new(config))
                .app_data(web::Data::new(state.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = web_test::TestRequest::post()
            .uri("/api/promotion/start")
            .set_json(json!({}))
            .to_request();
        let resp = web_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        let started: JobStarted = web_test::read_body_json(resp).await;

        let mut last = JobStatus::Pending;
        for _ in 0..200 {
            let req = web_test::TestRequest::get()
                .uri(&format!("/api/promotion/status/{}", started.job_id))
                .to_request();
            last = web_test::call_and_read_body_json(&app, req).await;
            if matches!(last, JobStatus::Completed(_) | JobStatus::Failed(_)) {
                break;
            }
            actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            last,
            JobStatus::Completed("promoted 1, completed 0, skipped 0 (unknown course or position)".to_string())
        );

        let req = web_test::TestRequest::get()
            .uri("/api/promotion/status/no-such-job")
            .to_request();
        assert_eq!(web_test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
