use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::student::{format_datetime, parse_datetime};
use crate::db::DatabaseError;
use crate::grading::{ComponentFeedback, ComponentScores};
use crate::models::enums::LetterGrade;
use crate::models::{GradeBreakdown, GradeRecord};

/// Insert a grade and its breakdown atomically.
///
/// The student must exist; the foreign key rejects orphan grades.
pub fn insert_grade(
    conn: &Connection,
    grade: &GradeRecord,
    breakdown: &GradeBreakdown,
) -> Result<(), DatabaseError> {
    if breakdown.grade_id != grade.id {
        return Err(DatabaseError::ConstraintViolation(format!(
            "Breakdown for {} attached to grade {}",
            breakdown.grade_id, grade.id
        )));
    }

    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO grades (id, student_id, final_score, final_grade, photo_url, graded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            grade.id.to_string(),
            grade.student_id.to_string(),
            grade.final_score,
            grade.final_grade.as_str(),
            grade.photo_url,
            format_datetime(&grade.graded_at),
        ],
    )?;

    let s = &breakdown.scores;
    let f = &breakdown.feedback;
    tx.execute(
        "INSERT INTO grade_breakdowns (grade_id, shirt_score, pant_score, shoes_score,
         grooming_score, cleanliness_score, shirt_feedback, pant_feedback, shoes_feedback,
         grooming_feedback, cleanliness_feedback)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            breakdown.grade_id.to_string(),
            s.shirt,
            s.pant,
            s.shoes,
            s.grooming,
            s.cleanliness,
            f.shirt,
            f.pant,
            f.shoes,
            f.grooming,
            f.cleanliness,
        ],
    )?;

    tx.commit()?;

    tracing::info!(
        grade_id = %grade.id,
        student_id = %grade.student_id,
        final_score = grade.final_score,
        final_grade = %grade.final_grade,
        "Grade stored"
    );
    Ok(())
}

pub fn get_grade(conn: &Connection, id: &Uuid) -> Result<Option<GradeRecord>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, student_id, final_score, final_grade, photo_url, graded_at
             FROM grades WHERE id = ?1",
            params![id.to_string()],
            grade_row_from_rusqlite,
        )
        .optional()?;

    row.map(grade_from_row).transpose()
}

pub fn get_breakdown(
    conn: &Connection,
    grade_id: &Uuid,
) -> Result<Option<GradeBreakdown>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT grade_id, shirt_score, pant_score, shoes_score, grooming_score,
             cleanliness_score, shirt_feedback, pant_feedback, shoes_feedback,
             grooming_feedback, cleanliness_feedback
             FROM grade_breakdowns WHERE grade_id = ?1",
            params![grade_id.to_string()],
            breakdown_row_from_rusqlite,
        )
        .optional()?;

    row.map(breakdown_from_row).transpose()
}

/// A student's grades, newest first.
pub fn list_grades_for_student(
    conn: &Connection,
    student_id: &Uuid,
) -> Result<Vec<GradeRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, final_score, final_grade, photo_url, graded_at
         FROM grades WHERE student_id = ?1 ORDER BY graded_at DESC",
    )?;

    let rows = stmt.query_map(params![student_id.to_string()], grade_row_from_rusqlite)?;

    let mut grades = Vec::new();
    for row in rows {
        grades.push(grade_from_row(row?)?);
    }
    Ok(grades)
}

/// Every grade, newest first. Used by aggregate reports.
pub fn list_all_grades(conn: &Connection) -> Result<Vec<GradeRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, final_score, final_grade, photo_url, graded_at
         FROM grades ORDER BY graded_at DESC",
    )?;

    let rows = stmt.query_map([], grade_row_from_rusqlite)?;

    let mut grades = Vec::new();
    for row in rows {
        grades.push(grade_from_row(row?)?);
    }
    Ok(grades)
}

/// Delete a grade; its breakdown goes with it (ON DELETE CASCADE).
pub fn delete_grade(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM grades WHERE id = ?1", params![id.to_string()])?;
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "grade".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// Internal row types for mapping
struct GradeRow {
    id: String,
    student_id: String,
    final_score: u8,
    final_grade: String,
    photo_url: Option<String>,
    graded_at: String,
}

fn grade_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<GradeRow, rusqlite::Error> {
    Ok(GradeRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        final_score: row.get(2)?,
        final_grade: row.get(3)?,
        photo_url: row.get(4)?,
        graded_at: row.get(5)?,
    })
}

fn grade_from_row(row: GradeRow) -> Result<GradeRecord, DatabaseError> {
    Ok(GradeRecord {
        id: parse_uuid(&row.id)?,
        student_id: parse_uuid(&row.student_id)?,
        final_score: row.final_score,
        final_grade: LetterGrade::from_str(&row.final_grade)?,
        photo_url: row.photo_url,
        graded_at: parse_datetime(&row.graded_at)?,
    })
}

struct BreakdownRow {
    grade_id: String,
    scores: ComponentScores,
    feedback: ComponentFeedback,
}

fn breakdown_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<BreakdownRow, rusqlite::Error> {
    Ok(BreakdownRow {
        grade_id: row.get(0)?,
        scores: ComponentScores {
            shirt: row.get(1)?,
            pant: row.get(2)?,
            shoes: row.get(3)?,
            grooming: row.get(4)?,
            cleanliness: row.get(5)?,
        },
        feedback: ComponentFeedback {
            shirt: row.get(6)?,
            pant: row.get(7)?,
            shoes: row.get(8)?,
            grooming: row.get(9)?,
            cleanliness: row.get(10)?,
        },
    })
}

fn breakdown_from_row(row: BreakdownRow) -> Result<GradeBreakdown, DatabaseError> {
    Ok(GradeBreakdown {
        grade_id: parse_uuid(&row.grade_id)?,
        scores: row.scores,
        feedback: row.feedback,
    })
}

fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}
