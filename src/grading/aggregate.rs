use super::scoring::ComponentScores;
use crate::models::enums::{Component, LetterGrade};

/// Component weights in percent. They sum to 100.
pub const WEIGHTS_PERCENT: [(Component, u32); 5] = [
    (Component::Shirt, 25),
    (Component::Pant, 25),
    (Component::Shoes, 20),
    (Component::Grooming, 15),
    (Component::Cleanliness, 15),
];

/// Letter cutoffs, checked high to low. Also used for report averages.
pub const GRADE_CUTOFFS: [(u8, LetterGrade); 4] = [
    (85, LetterGrade::A),
    (70, LetterGrade::B),
    (60, LetterGrade::C),
    (50, LetterGrade::D),
];

/// Weight of `component` as a fraction of 1.0.
pub fn weight(component: Component) -> f64 {
    WEIGHTS_PERCENT
        .iter()
        .find(|(c, _)| *c == component)
        .map(|(_, pct)| *pct as f64 / 100.0)
        .unwrap_or(0.0)
}

/// Weighted sum of the component scores, unrounded.
pub fn weighted_sum(scores: &ComponentScores) -> f64 {
    weighted_hundredths(scores) as f64 / 100.0
}

/// `round(weighted sum)`, halves rounded up.
///
/// Computed in integer hundredths so a sum like 87.5 never lands on 87.4999.
pub fn final_score(scores: &ComponentScores) -> u8 {
    let hundredths = weighted_hundredths(scores);
    ((hundredths + 50) / 100).min(100) as u8
}

fn weighted_hundredths(scores: &ComponentScores) -> u32 {
    WEIGHTS_PERCENT
        .iter()
        .map(|(component, pct)| scores.get(*component) as u32 * pct)
        .sum()
}

/// Classify any 0–100 score. Monotonic in `score`.
pub fn letter_for_score(score: u8) -> LetterGrade {
    GRADE_CUTOFFS
        .iter()
        .find(|(cutoff, _)| score >= *cutoff)
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F)
}

/// Classify a fractional average (e.g. a class mean) against the same
/// cutoffs, unrounded: 84.5 is still below the A cutoff.
pub fn letter_for_average(average: f64) -> LetterGrade {
    GRADE_CUTOFFS
        .iter()
        .find(|(cutoff, _)| average >= f64::from(*cutoff))
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F)
}
