use crate::db::{is_constraint_violation, Database};
use crate::error::{ApiError, ApiResult};
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use common::model::reference::{Branch, Course, YearSemesters};
use common::requests::{NewBranch, NewCourse};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const API_PATH: &str = "/api/courses";
const MAX_YEARS: u8 = 10;

/// *   **`GET /options`**: active courses with their active branches and structure.
/// *   **`POST /`**: create a course.
/// *   **`POST /{course_id}/branches`**: add a branch to a course.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/options", get().to(options))
        .route("", post().to(create))
        .route("/{course_id}/branches", post().to(create_branch_handler))
}

async fn options(db: web::Data<Database>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    Ok(HttpResponse::Ok().json(load_courses(&conn, true)?))
}

async fn create(db: web::Data<Database>, payload: web::Json<NewCourse>) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let course = create_course(&conn, &payload)?;
    info!("Created course {} ({})", course.id, course.name);
    Ok(HttpResponse::Created().json(course))
}

async fn create_branch_handler(
    db: web::Data<Database>,
    course_id: web::Path<i64>,
    payload: web::Json<NewBranch>,
) -> ApiResult<HttpResponse> {
    let conn = db.open()?;
    let branch = create_branch(&conn, *course_id, &payload)?;
    info!("Created branch {} for course {}", branch.name, branch.course_id);
    Ok(HttpResponse::Created().json(branch))
}

const COURSE_COLUMNS: &str = "id, name, code, college_id, level, total_years, semesters_per_year,
     year_semester_config, is_active";

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<(Course, Option<String>)> {
    Ok((
        Course {
            id: row.get(0)?,
            name: row.get(1)?,
            code: row.get(2)?,
            college_id: row.get(3)?,
            level: row.get(4)?,
            total_years: row.get(5)?,
            semesters_per_year: row.get(6)?,
            year_semester_config: None,
            is_active: row.get(8)?,
            branches: Vec::new(),
        },
        row.get(7)?,
    ))
}

fn with_config(pair: (Course, Option<String>)) -> ApiResult<Course> {
    let (mut course, config) = pair;
    course.year_semester_config = match config {
        Some(json) if !json.trim().is_empty() => Some(serde_json::from_str(&json)?),
        _ => None,
    };
    Ok(course)
}

fn load_branches(conn: &Connection, active_only: bool) -> ApiResult<HashMap<i64, Vec<Branch>>> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, name, code, academic_year_id, is_active FROM course_branches
         WHERE is_active = 1 OR ?1 = 0 ORDER BY name, id",
    )?;
    let branches = stmt
        .query_map(params![active_only], |row| {
            Ok(Branch {
                id: row.get(0)?,
                course_id: row.get(1)?,
                name: row.get(2)?,
                code: row.get(3)?,
                academic_year_id: row.get(4)?,
                is_active: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut by_course: HashMap<i64, Vec<Branch>> = HashMap::new();
    for branch in branches {
        by_course.entry(branch.course_id).or_default().push(branch);
    }
    Ok(by_course)
}

/// Courses with nested branches, ordered by name.
pub fn load_courses(conn: &Connection, active_only: bool) -> ApiResult<Vec<Course>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE is_active = 1 OR ?1 = 0 ORDER BY name"
    ))?;
    let rows = stmt
        .query_map(params![active_only], course_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    let mut branches = load_branches(conn, active_only)?;

    rows.into_iter()
        .map(|pair| {
            let mut course = with_config(pair)?;
            course.branches = branches.remove(&course.id).unwrap_or_default();
            Ok(course)
        })
        .collect()
}

/// Looks a course up by its display name, the value students submit.
pub fn find_course_by_name(conn: &Connection, name: &str) -> ApiResult<Option<Course>> {
    let pair = conn
        .query_row(
            &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE name = ?1"),
            params![name.trim()],
            course_from_row,
        )
        .optional()?;
    pair.map(with_config).transpose()
}

fn validate_structure(new: &NewCourse) -> ApiResult<()> {
    let invalid = |reason: &str| ApiError::InvalidField {
        field: "year_semester_config".to_string(),
        reason: reason.to_string(),
    };
    if new.total_years > MAX_YEARS {
        return Err(ApiError::InvalidField {
            field: "total_years".to_string(),
            reason: format!("at most {MAX_YEARS} years"),
        });
    }
    if let Some(config) = &new.year_semester_config {
        let mut years: Vec<u8> = config.iter().map(|c| c.year).collect();
        if config.iter().any(|c| c.year == 0 || c.year > MAX_YEARS || c.semesters == 0) {
            return Err(invalid("years and semesters must be positive"));
        }
        years.sort_unstable();
        years.dedup();
        if years.len() != config.len() {
            return Err(invalid("each year may appear once"));
        }
    }
    Ok(())
}

pub fn create_course(conn: &Connection, new: &NewCourse) -> ApiResult<Course> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingField("name".to_string()));
    }
    validate_structure(new)?;
    if let Some(college_id) = new.college_id {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM colleges WHERE id = ?1)",
            params![college_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(ApiError::InvalidField {
                field: "college_id".to_string(),
                reason: format!("college {college_id} does not exist"),
            });
        }
    }

    let config: Option<&Vec<YearSemesters>> = new.year_semester_config.as_ref().filter(|c| !c.is_empty());
    let config_json = config.map(serde_json::to_string).transpose()?;
    let semesters_per_year = if new.semesters_per_year == 0 { 2 } else { new.semesters_per_year };
    let level = new.level.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let code = new.code.as_deref().map(str::trim).filter(|c| !c.is_empty());

    conn.execute(
        "INSERT INTO courses (name, code, college_id, level, total_years, semesters_per_year, year_semester_config)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            name,
            code,
            new.college_id,
            level,
            new.total_years,
            semesters_per_year,
            config_json
        ],
    )
    .map_err(|e| match e {
        e if is_constraint_violation(&e) => ApiError::Conflict(format!("course '{name}' already exists")),
        e => e.into(),
    })?;

    Ok(Course {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        code: code.map(str::to_string),
        college_id: new.college_id,
        level: level.map(str::to_string),
        total_years: new.total_years,
        semesters_per_year,
        year_semester_config: config.cloned(),
        is_active: true,
        branches: Vec::new(),
    })
}

/// Adds a branch. A branch is unique per (course, name, academic year), where an
/// unscoped branch counts as one more academic year value.
pub fn create_branch(conn: &Connection, course_id: i64, new: &NewBranch) -> ApiResult<Branch> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingField("name".to_string()));
    }
    let course_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM courses WHERE id = ?1)",
        params![course_id],
        |row| row.get(0),
    )?;
    if !course_exists {
        return Err(ApiError::NotFound(format!("course {course_id} not found")));
    }
    if let Some(year_id) = new.academic_year_id {
        let year_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM academic_years WHERE id = ?1)",
            params![year_id],
            |row| row.get(0),
        )?;
        if !year_exists {
            return Err(ApiError::InvalidField {
                field: "academic_year_id".to_string(),
                reason: format!("academic year {year_id} does not exist"),
            });
        }
    }

    let code = new.code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    conn.execute(
        "INSERT INTO course_branches (course_id, name, code, academic_year_id) VALUES (?1, ?2, ?3, ?4)",
        params![course_id, name, code, new.academic_year_id],
    )
    .map_err(|e| match e {
        e if is_constraint_violation(&e) => {
            ApiError::Conflict(format!("branch '{name}' already exists for this course and year"))
        }
        e => e.into(),
    })?;

    Ok(Branch {
        id: conn.last_insert_rowid(),
        course_id,
        name: name.to_string(),
        code: code.map(str::to_string),
        academic_year_id: new.academic_year_id,
        is_active: true,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::testing::database;
    use crate::services::reference::academic_years::create_academic_year;
    use actix_web::{test as web_test, App};

    pub fn new_course(name: &str, level: &str, total_years: u8) -> NewCourse {
        NewCourse {
            name: name.to_string(),
            code: None,
            college_id: None,
            level: Some(level.to_string()),
            total_years,
            semesters_per_year: 2,
            year_semester_config: None,
        }
    }

    fn new_branch(name: &str, academic_year_id: Option<i64>) -> NewBranch {
        NewBranch {
            name: name.to_string(),
            code: None,
            academic_year_id,
        }
    }

    #[test]
    fn branch_uniqueness_is_per_course_name_and_year() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        let btech = create_course(&conn, &new_course("B.Tech", "UG", 4)).unwrap();
        let year = create_academic_year(&conn, "2024-2025").unwrap();

        create_branch(&conn, btech.id, &new_branch("CSE", None)).unwrap();
        create_branch(&conn, btech.id, &new_branch("CSE", Some(year.id))).unwrap();
        assert!(matches!(
            create_branch(&conn, btech.id, &new_branch("CSE", Some(year.id))),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            create_branch(&conn, 999, &new_branch("ECE", None)),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            create_branch(&conn, btech.id, &new_branch("ECE", Some(999))),
            Err(ApiError::InvalidField { .. })
        ));
    }

    #[test]
    fn config_round_trips_and_is_validated() {
        let (_dir, db) = database();
        let conn = db.open().unwrap();
        let mut pharm = new_course("Pharm.D", "PG", 0);
        pharm.year_semester_config = Some(vec![
            YearSemesters { year: 1, semesters: 1 },
            YearSemesters { year: 2, semesters: 1 },
        ]);
        create_course(&conn, &pharm).unwrap();
        let loaded = find_course_by_name(&conn, " Pharm.D ").unwrap().unwrap();
        assert_eq!(loaded.year_semester_config, pharm.year_semester_config);
        assert_eq!(loaded.level.as_deref(), Some("PG"));

        let mut broken = new_course("M.Tech", "PG", 2);
        broken.year_semester_config = Some(vec![
            YearSemesters { year: 1, semesters: 2 },
            YearSemesters { year: 1, semesters: 2 },
        ]);
        assert!(matches!(
            create_course(&conn, &broken),
            Err(ApiError::InvalidField { .. })
        ));
        assert!(find_course_by_name(&conn, "MBA").unwrap().is_none());
    }

    #[actix_web::test]
    async fn options_nest_active_branches() {
        let (_dir, db) = database();
        {
            let conn = db.open().unwrap();
            let btech = create_course(&conn, &new_course("B.Tech", "UG", 4)).unwrap();
            create_course(&conn, &new_course("Diploma", "Diploma", 3)).unwrap();
            create_branch(&conn, btech.id, &new_branch("CSE", None)).unwrap();
            create_branch(&conn, btech.id, &new_branch("Mining", None)).unwrap();
            conn.execute("UPDATE course_branches SET is_active = 0 WHERE name = 'Mining'", [])
                .unwrap();
        }
        let app = web_test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .service(configure_routes()),
        )
        .await;
        let req = web_test::TestRequest::get().uri("/api/courses/options").to_request();
        let courses: Vec<Course> = web_test::call_and_read_body_json(&app, req).await;
        assert_eq!(courses.len(), 2);
        let btech = courses.iter().find(|c| c.name == "B.Tech").unwrap();
        let names: Vec<&str> = btech.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["CSE"]);
        let diploma = courses.iter().find(|c| c.name == "Diploma").unwrap();
        assert!(diploma.branches.is_empty());
    }
}
