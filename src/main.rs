use std::path::Path;
use std::process::ExitCode;

use thiserror::Error;
use uuid::Uuid;

use uniform_grade::config::{self, ConfigError, GraderConfig};
use uniform_grade::db::{self, DatabaseError};
use uniform_grade::grading::GradingEngine;
use uniform_grade::models::Student;
use uniform_grade::report::{grade_distribution, student_summary};
use uniform_grade::storage::LocalPhotoStore;
use uniform_grade::submission::{submit_photo, SubmissionError};

const USAGE: &str = "usage:
  uniform-grade grade <photo>
  uniform-grade add-student <name> [class]
  uniform-grade submit <student-id> <photo>
  uniform-grade report [student-id]";

#[derive(Error, Debug)]
enum CliError {
    #[error("{}", USAGE)]
    Usage,

    #[error("Invalid student id {0}")]
    InvalidId(String),

    #[error("Failed to read {path}: {source}")]
    ReadPhoto {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    uniform_grade::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<String, CliError> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["grade", photo] => {
            let engine = GradingEngine::new(load_config()?);
            let result = engine.grade_async(read_photo(photo)?).await;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        ["add-student", name] => add_student(name, None),
        ["add-student", name, class] => add_student(name, Some(*class)),
        ["submit", student_id, photo] => {
            let student_id = parse_id(student_id)?;
            let bytes = read_photo(photo)?;
            let engine = GradingEngine::new(load_config()?);
            let conn = db::open_database(&config::database_path())?;
            let store = LocalPhotoStore::new(config::photos_dir());

            let submission = submit_photo(&conn, &store, &engine, &student_id, &bytes)?;
            Ok(serde_json::to_string_pretty(&submission)?)
        }
        ["report"] => {
            let conn = db::open_database(&config::database_path())?;
            Ok(serde_json::to_string_pretty(&grade_distribution(&conn)?)?)
        }
        ["report", student_id] => {
            let student_id = parse_id(student_id)?;
            let conn = db::open_database(&config::database_path())?;
            Ok(serde_json::to_string_pretty(&student_summary(&conn, &student_id)?)?)
        }
        _ => Err(CliError::Usage),
    }
}

fn add_student(name: &str, class: Option<&str>) -> Result<String, CliError> {
    let conn = db::open_database(&config::database_path())?;
    let student = Student::new(name, class.map(str::to_string));
    db::insert_student(&conn, &student)?;
    Ok(student.id.to_string())
}

fn load_config() -> Result<GraderConfig, CliError> {
    Ok(GraderConfig::load(&config::config_path())?)
}

fn read_photo(path: &str) -> Result<Vec<u8>, CliError> {
    std::fs::read(Path::new(path)).map_err(|source| CliError::ReadPhoto {
        path: path.to_string(),
        source,
    })
}

fn parse_id(value: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value).map_err(|_| CliError::InvalidId(value.to_string()))
}
