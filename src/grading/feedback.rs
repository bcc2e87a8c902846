use serde::{Deserialize, Serialize};

use super::scoring::ComponentScores;
use crate::models::enums::{Component, FeedbackTier};

/// Shown for every component when the photo could not be analyzed.
pub const UNREADABLE_PHOTO_FEEDBACK: &str =
    "Unable to analyze this photo. Please upload a clearer, well-lit full-body photo.";

/// Feedback text per component, keyed like [`ComponentScores`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFeedback {
    pub shirt: String,
    pub pant: String,
    pub shoes: String,
    pub grooming: String,
    pub cleanliness: String,
}

impl ComponentFeedback {
    /// Same message for all five components.
    pub fn repeated(message: &str) -> Self {
        Self {
            shirt: message.to_owned(),
            pant: message.to_owned(),
            shoes: message.to_owned(),
            grooming: message.to_owned(),
            cleanliness: message.to_owned(),
        }
    }

    pub fn get(&self, component: Component) -> &str {
        match component {
            Component::Shirt => &self.shirt,
            Component::Pant => &self.pant,
            Component::Shoes => &self.shoes,
            Component::Grooming => &self.grooming,
            Component::Cleanliness => &self.cleanliness,
        }
    }
}

/// Tier cutoffs, identical for every component.
pub fn feedback_tier(score: u8) -> FeedbackTier {
    match score {
        90.. => FeedbackTier::Excellent,
        75..=89 => FeedbackTier::Good,
        60..=74 => FeedbackTier::NeedsAttention,
        45..=59 => FeedbackTier::NeedsImprovement,
        _ => FeedbackTier::BelowStandard,
    }
}

pub fn feedback_message(component: Component, tier: FeedbackTier) -> &'static str {
    use Component::*;
    use FeedbackTier::*;

    match (component, tier) {
        (Shirt, Excellent) => "Shirt is crisp, clean, and properly worn.",
        (Shirt, Good) => "Shirt looks good. Minor wrinkles or a loose tuck could be improved.",
        (Shirt, NeedsAttention) => "Shirt needs attention. Check for wrinkles, stains, or an untucked hem.",
        (Shirt, NeedsImprovement) => "Shirt needs improvement. It appears creased, discolored, or poorly fitted.",
        (Shirt, BelowStandard) => "Shirt does not meet uniform standards. Wear a clean, ironed regulation shirt.",

        (Pant, Excellent) => "Pants are neat, pressed, and the correct uniform color.",
        (Pant, Good) => "Pants look good. A sharper crease would complete the look.",
        (Pant, NeedsAttention) => "Pants need attention. Check the fit, crease, and color.",
        (Pant, NeedsImprovement) => "Pants need improvement. They appear faded, creased, or off-color.",
        (Pant, BelowStandard) => "Pants do not meet uniform standards. Wear clean regulation pants.",

        (Shoes, Excellent) => "Shoes are polished and in excellent condition.",
        (Shoes, Good) => "Shoes look good. A fresh polish would make them shine.",
        (Shoes, NeedsAttention) => "Shoes need attention. Clean and polish them before the next check.",
        (Shoes, NeedsImprovement) => "Shoes need improvement. They appear scuffed, dusty, or non-regulation.",
        (Shoes, BelowStandard) => "Shoes do not meet uniform standards. Wear clean black regulation shoes.",

        (Grooming, Excellent) => "Grooming is excellent. Hair is neat and well kept.",
        (Grooming, Good) => "Grooming looks good. Small touch-ups would make it perfect.",
        (Grooming, NeedsAttention) => "Grooming needs attention. Tidy your hair and overall appearance.",
        (Grooming, NeedsImprovement) => "Grooming needs improvement. Hair appears untidy or unkempt.",
        (Grooming, BelowStandard) => "Grooming does not meet standards. Please follow the grooming guidelines.",

        (Cleanliness, Excellent) => "Uniform is spotless.",
        (Cleanliness, Good) => "Uniform is clean overall. Watch for small marks or lint.",
        (Cleanliness, NeedsAttention) => "Cleanliness needs attention. Some stains or dirt are visible.",
        (Cleanliness, NeedsImprovement) => "Cleanliness needs improvement. The uniform appears dirty or dull.",
        (Cleanliness, BelowStandard) => "Cleanliness does not meet standards. Wash the uniform before wearing it.",
    }
}

pub fn feedback_for(component: Component, score: u8) -> &'static str {
    feedback_message(component, feedback_tier(score))
}

/// Map every component score to its feedback text.
pub fn map_feedback(scores: &ComponentScores) -> ComponentFeedback {
    ComponentFeedback {
        shirt: feedback_for(Component::Shirt, scores.shirt).to_owned(),
        pant: feedback_for(Component::Pant, scores.pant).to_owned(),
        shoes: feedback_for(Component::Shoes, scores.shoes).to_owned(),
        grooming: feedback_for(Component::Grooming, scores.grooming).to_owned(),
        cleanliness: feedback_for(Component::Cleanliness, scores.cleanliness).to_owned(),
    }
}
