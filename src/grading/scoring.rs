//! Rule-based component scores.
//!
//! Each rule starts at 100 and applies stacked deductions. Within one check
//! the branches are exclusive (first match wins); separate checks add up.
//! The result is clamped to `[0, 100]`.

use serde::{Deserialize, Serialize};

use super::regions::RegionSamples;
use super::stats::RegionStats;
use crate::models::enums::Component;

const BASE_SCORE: i32 = 100;

/// The five component scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub shirt: u8,
    pub pant: u8,
    pub shoes: u8,
    pub grooming: u8,
    pub cleanliness: u8,
}

impl ComponentScores {
    pub fn uniform(score: u8) -> Self {
        let score = score.min(100);
        Self {
            shirt: score,
            pant: score,
            shoes: score,
            grooming: score,
            cleanliness: score,
        }
    }

    pub fn get(&self, component: Component) -> u8 {
        match component {
            Component::Shirt => self.shirt,
            Component::Pant => self.pant,
            Component::Shoes => self.shoes,
            Component::Grooming => self.grooming,
            Component::Cleanliness => self.cleanliness,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, u8)> + '_ {
        Component::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// Clamp an accumulated score into `[0, 100]`.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Score all five components from one set of region samples.
pub fn score_components(samples: &RegionSamples) -> ComponentScores {
    ComponentScores {
        shirt: score_shirt(&samples.full),
        pant: score_pant(&samples.lower_half, &samples.full),
        shoes: score_shoes(&samples.bottom_strip, &samples.full),
        grooming: score_grooming(&samples.top_strip, &samples.full),
        cleanliness: score_cleanliness(&samples.full),
    }
}

pub fn score_shirt(full: &RegionStats) -> u8 {
    let mut score = BASE_SCORE;

    // Lighting
    if full.avg_brightness < 80.0 {
        score -= 20;
    } else if full.avg_brightness > 220.0 {
        score -= 10;
    }

    let variation = full.color_variation();
    if variation > 100.0 {
        score -= 15;
    } else if variation > 50.0 {
        score -= 5;
    }

    if full.dark_pixel_ratio > 0.4 {
        score -= 20;
    } else if full.dark_pixel_ratio > 0.25 {
        score -= 10;
    }

    // A white shirt should show up somewhere in frame.
    if full.white_pixel_ratio < 0.05 {
        score -= 15;
    }

    clamp_score(score)
}

/// Brightness and dark ratio come from the lower half; color spread from the full frame.
pub fn score_pant(lower: &RegionStats, full: &RegionStats) -> u8 {
    let mut score = BASE_SCORE;

    let brightness = lower.avg_brightness;
    if !(50.0..=160.0).contains(&brightness) {
        score -= 25;
    } else if !(60.0..=150.0).contains(&brightness) {
        score -= 10;
    }

    if full.color_variation() > 80.0 {
        score -= 15;
    }

    if lower.dark_pixel_ratio > 0.5 {
        score -= 15;
    } else if lower.dark_pixel_ratio > 0.3 {
        score -= 8;
    }

    clamp_score(score)
}

/// Expects dark polished shoes in the bottom strip.
pub fn score_shoes(bottom: &RegionStats, full: &RegionStats) -> u8 {
    let mut score = BASE_SCORE;

    let brightness = bottom.avg_brightness;
    if !(40.0..=180.0).contains(&brightness) {
        score -= 30;
    } else if !(50.0..=160.0).contains(&brightness) {
        score -= 15;
    }

    if bottom.dark_pixel_ratio < 0.2 {
        score -= 25;
    } else if bottom.dark_pixel_ratio < 0.35 {
        score -= 10;
    }

    if full.avg_brightness < 70.0 {
        score -= 10;
    }

    clamp_score(score)
}

pub fn score_grooming(top: &RegionStats, full: &RegionStats) -> u8 {
    let mut score = BASE_SCORE;

    if top.avg_brightness < 90.0 {
        score -= 20;
    } else if top.avg_brightness > 230.0 {
        score -= 10;
    }

    if top.dark_pixel_ratio > 0.4 {
        score -= 25;
    } else if top.dark_pixel_ratio > 0.25 {
        score -= 10;
    }

    if full.color_variation() > 120.0 {
        score -= 15;
    }

    clamp_score(score)
}

pub fn score_cleanliness(full: &RegionStats) -> u8 {
    let mut score = BASE_SCORE;

    if full.avg_brightness < 100.0 {
        score -= 25;
    } else if full.avg_brightness < 120.0 {
        score -= 10;
    }

    if full.dark_pixel_ratio > 0.45 {
        score -= 25;
    } else if full.dark_pixel_ratio > 0.35 {
        score -= 15;
    } else if full.dark_pixel_ratio > 0.25 {
        score -= 8;
    }

    if full.white_pixel_ratio < 0.1 {
        score -= 15;
    } else if full.white_pixel_ratio < 0.15 {
        score -= 5;
    }

    // A completely flat palette reads as a washed-out or faded uniform.
    if full.color_variation() < 15.0 {
        score -= 10;
    }

    clamp_score(score)
}
