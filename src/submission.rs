//! Submit a student's uniform photo: grade it, store it, record the grade.

use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{get_student, insert_grade};
use crate::db::DatabaseError;
use crate::grading::{
    assess_photo, fallback_result, grade_image, GradingEngine, GradingResult, PhotoAdvisory,
};
use crate::models::GradeRecord;
use crate::storage::{PhotoStore, StorageError};

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Photo storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of one submission. Advisories are returned for display only.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub grade: GradeRecord,
    pub result: GradingResult,
    pub advisories: Vec<PhotoAdvisory>,
}

/// Grade and record a photo for `student_id`.
///
/// Unreadable photos are still stored and recorded, with the fallback
/// result and a single [`PhotoAdvisory::Unreadable`].
pub fn submit_photo(
    conn: &Connection,
    store: &dyn PhotoStore,
    engine: &GradingEngine,
    student_id: &Uuid,
    bytes: &[u8],
) -> Result<Submission, SubmissionError> {
    if get_student(conn, student_id)?.is_none() {
        return Err(DatabaseError::NotFound {
            entity_type: "student".into(),
            id: student_id.to_string(),
        }
        .into());
    }

    let (result, advisories) = match engine.decode(bytes) {
        Ok(image) => (grade_image(&image), assess_photo(&image)),
        Err(e) => {
            tracing::warn!(student_id = %student_id, error = %e, "Submitted photo unreadable, using fallback grade");
            (fallback_result(), vec![PhotoAdvisory::Unreadable])
        }
    };

    let stored = store.store(student_id, bytes)?;
    let (grade, breakdown) = GradeRecord::from_result(*student_id, &result, Some(stored.url));
    insert_grade(conn, &grade, &breakdown)?;

    tracing::info!(
        student_id = %student_id,
        grade_id = %grade.id,
        final_score = grade.final_score,
        advisories = advisories.len(),
        "Photo submitted"
    );

    Ok(Submission {
        grade,
        result,
        advisories,
    })
}
