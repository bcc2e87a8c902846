//! Aggregate grade reports: school-wide distribution and per-student summary.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repository::{get_student, list_all_grades, list_grades_for_student};
use crate::db::DatabaseError;
use crate::grading::letter_for_average;
use crate::models::enums::LetterGrade;
use crate::models::GradeRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDistribution {
    /// Every letter is present, zero counts included.
    pub counts: BTreeMap<LetterGrade, u32>,
    pub total: u32,
    /// `None` when no grades exist. `mean_grade` classifies it unrounded.
    pub mean_score: Option<f64>,
    pub mean_grade: Option<LetterGrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAverages {
    pub shirt: f64,
    pub pant: f64,
    pub shoes: f64,
    pub grooming: f64,
    pub cleanliness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student_id: Uuid,
    pub student_name: String,
    pub grade_count: u32,
    pub mean_score: Option<f64>,
    pub mean_grade: Option<LetterGrade>,
    pub component_averages: Option<ComponentAverages>,
    pub latest: Option<GradeRecord>,
}

/// Letter counts and mean over every stored grade.
pub fn grade_distribution(conn: &Connection) -> Result<GradeDistribution, DatabaseError> {
    let grades = list_all_grades(conn)?;

    let mut counts: BTreeMap<LetterGrade, u32> =
        LetterGrade::ALL.iter().map(|g| (*g, 0)).collect();
    for grade in &grades {
        *counts.entry(grade.final_grade).or_insert(0) += 1;
    }

    let mean_score = mean_final_score(&grades);
    Ok(GradeDistribution {
        counts,
        total: grades.len() as u32,
        mean_score,
        mean_grade: mean_score.map(letter_for_average),
    })
}

/// Summary of one student's grade history.
pub fn student_summary(
    conn: &Connection,
    student_id: &Uuid,
) -> Result<StudentSummary, DatabaseError> {
    let student = get_student(conn, student_id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "student".into(),
        id: student_id.to_string(),
    })?;

    let grades = list_grades_for_student(conn, student_id)?;
    let mean_score = mean_final_score(&grades);
    let component_averages = if grades.is_empty() {
        None
    } else {
        Some(component_averages(conn, student_id)?)
    };

    Ok(StudentSummary {
        student_id: student.id,
        student_name: student.name,
        grade_count: grades.len() as u32,
        mean_score,
        mean_grade: mean_score.map(letter_for_average),
        component_averages,
        // Newest first
        latest: grades.into_iter().next(),
    })
}

fn mean_final_score(grades: &[GradeRecord]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    let sum: u32 = grades.iter().map(|g| g.final_score as u32).sum();
    Some(sum as f64 / grades.len() as f64)
}

fn component_averages(
    conn: &Connection,
    student_id: &Uuid,
) -> Result<ComponentAverages, DatabaseError> {
    let averages = conn.query_row(
        "SELECT AVG(b.shirt_score), AVG(b.pant_score), AVG(b.shoes_score),
                AVG(b.grooming_score), AVG(b.cleanliness_score)
         FROM grade_breakdowns b
         JOIN grades g ON g.id = b.grade_id
         WHERE g.student_id = ?1",
        params![student_id.to_string()],
        |row| {
            Ok(ComponentAverages {
                shirt: row.get::<_, Option<f64>>(0)?.unwrap_or(0.0),
                pant: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                shoes: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                grooming: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                cleanliness: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            })
        },
    )?;
    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_grade, insert_student};
    use crate::db::sqlite::open_memory_database;
    use crate::grading::{fallback_result, ComponentScores, GradingResult};
    use crate::models::Student;

    fn record(conn: &Connection, student: &Student, scores: ComponentScores) -> GradeRecord {
        let result = GradingResult::from_scores(scores);
        let (grade, breakdown) = GradeRecord::from_result(student.id, &result, None);
        insert_grade(conn, &grade, &breakdown).unwrap();
        grade
    }

    #[test]
    fn empty_distribution() {
        let conn = open_memory_database().unwrap();
        let dist = grade_distribution(&conn).unwrap();
        assert_eq!(dist.total, 0);
        assert_eq!(dist.counts.len(), 5);
        assert!(dist.counts.values().all(|c| *c == 0));
        assert_eq!(dist.mean_score, None);
        assert_eq!(dist.mean_grade, None);
    }

    #[test]
    fn distribution_counts_and_mean() {
        let conn = open_memory_database().unwrap();
        let student = Student::new("Ada", None);
        insert_student(&conn, &student).unwrap();

        record(&conn, &student, ComponentScores::uniform(90)); // 90 A
        record(&conn, &student, ComponentScores::uniform(75)); // 75 B
        record(&conn, &student, ComponentScores::uniform(50)); // 50 D

        let dist = grade_distribution(&conn).unwrap();
        assert_eq!(dist.total, 3);
        assert_eq!(dist.counts[&LetterGrade::A], 1);
        assert_eq!(dist.counts[&LetterGrade::B], 1);
        assert_eq!(dist.counts[&LetterGrade::C], 0);
        assert_eq!(dist.counts[&LetterGrade::D], 1);
        assert_eq!(dist.counts[&LetterGrade::F], 0);
        // (90 + 75 + 50) / 3 = 71.67 → B
        let mean = dist.mean_score.unwrap();
        assert!((mean - 71.666_666).abs() < 1e-3);
        assert_eq!(dist.mean_grade, Some(LetterGrade::B));
    }

    #[test]
    fn mean_is_classified_unrounded() {
        let conn = open_memory_database().unwrap();
        let student = Student::new("Ada", None);
        insert_student(&conn, &student).unwrap();

        record(&conn, &student, ComponentScores::uniform(85));
        record(&conn, &student, ComponentScores::uniform(84));

        // 84.5 sits below the A cutoff
        let dist = grade_distribution(&conn).unwrap();
        assert_eq!(dist.mean_score, Some(84.5));
        assert_eq!(dist.mean_grade, Some(LetterGrade::B));
    }

    #[test]
    fn student_summary_averages_components() {
        let conn = open_memory_database().unwrap();
        let student = Student::new("Linus", Some("10-B".into()));
        let other = Student::new("Other", None);
        insert_student(&conn, &student).unwrap();
        insert_student(&conn, &other).unwrap();

        let (mut first, first_bd) =
            GradeRecord::from_result(student.id, &fallback_result(), None);
        first.graded_at -= chrono::Duration::hours(1);
        insert_grade(&conn, &first, &first_bd).unwrap();
        let latest = record(
            &conn,
            &student,
            ComponentScores { shirt: 90, pant: 80, shoes: 70, grooming: 60, cleanliness: 100 },
        );
        record(&conn, &other, ComponentScores::uniform(10));

        let summary = student_summary(&conn, &student.id).unwrap();
        assert_eq!(summary.student_name, "Linus");
        assert_eq!(summary.grade_count, 2);
        assert_eq!(summary.latest.as_ref().map(|g| g.id), Some(latest.id));

        let avg = summary.component_averages.unwrap();
        assert_eq!(avg.shirt, 70.0);
        assert_eq!(avg.pant, 65.0);
        assert_eq!(avg.shoes, 60.0);
        assert_eq!(avg.grooming, 55.0);
        assert_eq!(avg.cleanliness, 75.0);

        // fallback 50 + latest 80 (90*.25+80*.25+70*.2+60*.15+100*.15 = 80.5 → 81)
        assert_eq!(latest.final_score, 81);
        assert_eq!(summary.mean_score, Some(65.5));
        assert_eq!(summary.mean_grade, Some(LetterGrade::C));
    }

    #[test]
    fn summary_for_student_without_grades() {
        let conn = open_memory_database().unwrap();
        let student = Student::new("New", None);
        insert_student(&conn, &student).unwrap();

        let summary = student_summary(&conn, &student.id).unwrap();
        assert_eq!(summary.grade_count, 0);
        assert!(summary.mean_score.is_none());
        assert!(summary.component_averages.is_none());
        assert!(summary.latest.is_none());
    }

    #[test]
    fn summary_for_unknown_student_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = student_summary(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
