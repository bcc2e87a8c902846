use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Student;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn insert_student(conn: &Connection, student: &Student) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO students (id, name, class_name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            student.id.to_string(),
            student.name,
            student.class_name,
            student.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_student(conn: &Connection, id: &Uuid) -> Result<Option<Student>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, class_name, created_at FROM students WHERE id = ?1",
            params![id.to_string()],
            student_row_from_rusqlite,
        )
        .optional()?;

    row.map(student_from_row).transpose()
}

/// All students ordered by name.
pub fn list_students(conn: &Connection) -> Result<Vec<Student>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, class_name, created_at FROM students ORDER BY name COLLATE NOCASE",
    )?;

    let rows = stmt.query_map([], student_row_from_rusqlite)?;

    let mut students = Vec::new();
    for row in rows {
        students.push(student_from_row(row?)?);
    }
    Ok(students)
}

struct StudentRow {
    id: String,
    name: String,
    class_name: Option<String>,
    created_at: String,
}

fn student_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<StudentRow, rusqlite::Error> {
    Ok(StudentRow {
        id: row.get(0)?,
        name: row.get(1)?,
        class_name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn student_from_row(row: StudentRow) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        class_name: row.class_name,
        created_at: parse_datetime(&row.created_at)?,
    })
}

pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Bad timestamp {value:?}: {e}")))
}

pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}
