//! Image-statistics grading engine.
//!
//! Pixel buffer → region statistics → five component scores → feedback and
//! weighted letter grade. Everything below `engine` is pure and synchronous.

pub mod advisory;
pub mod aggregate;
pub mod decode;
pub mod engine;
pub mod feedback;
pub mod regions;
pub mod scoring;
pub mod stats;

pub use advisory::*;
pub use aggregate::*;
pub use decode::*;
pub use engine::*;
pub use feedback::*;
pub use regions::*;
pub use scoring::*;
pub use stats::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::LetterGrade;

#[derive(Error, Debug)]
pub enum GradingError {
    #[error("Image data too small to be valid ({0} bytes)")]
    TooSmall(usize),

    #[error("Image data exceeds {limit_mb}MB limit ({size} bytes)")]
    TooLarge { size: usize, limit_mb: usize },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Raw buffer of {len} bytes does not match {width}x{height} RGBA")]
    MalformedBuffer { width: u32, height: u32, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Complete outcome of one grading call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingResult {
    pub final_score: u8,
    pub final_grade: LetterGrade,
    pub breakdown: ComponentScores,
    pub feedback: ComponentFeedback,
}

impl GradingResult {
    /// Assemble a result from component scores; score, grade and feedback
    /// are all derived, never supplied.
    pub fn from_scores(breakdown: ComponentScores) -> Self {
        let final_score = final_score(&breakdown);
        Self {
            final_score,
            final_grade: letter_for_score(final_score),
            feedback: map_feedback(&breakdown),
            breakdown,
        }
    }
}
