use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::LetterGrade;
use crate::grading::{ComponentFeedback, ComponentScores, GradingResult};

/// Parent grade record. Identity is assigned here, not by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub final_score: u8,
    pub final_grade: LetterGrade,
    pub photo_url: Option<String>,
    pub graded_at: NaiveDateTime,
}

/// Child record, one-to-one with [`GradeRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBreakdown {
    pub grade_id: Uuid,
    pub scores: ComponentScores,
    pub feedback: ComponentFeedback,
}

impl GradeRecord {
    /// Split an engine result into the two persisted records.
    pub fn from_result(
        student_id: Uuid,
        result: &GradingResult,
        photo_url: Option<String>,
    ) -> (GradeRecord, GradeBreakdown) {
        let id = Uuid::new_v4();
        let record = GradeRecord {
            id,
            student_id,
            final_score: result.final_score,
            final_grade: result.final_grade,
            photo_url,
            graded_at: chrono::Local::now().naive_local(),
        };
        let breakdown = GradeBreakdown {
            grade_id: id,
            scores: result.breakdown,
            feedback: result.feedback.clone(),
        };
        (record, breakdown)
    }
}
