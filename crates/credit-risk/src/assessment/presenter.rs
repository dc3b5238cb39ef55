use serde::Serialize;

use super::domain::{PredictionResult, Rating};

/// CSS class for a rating. `Poor` is also where unrecognised labels end up.
pub const fn rating_class(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "rating-excellent",
        Rating::Good => "rating-good",
        Rating::Average => "rating-average",
        Rating::Poor => "rating-poor",
    }
}

pub const fn rating_icon(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "\u{1F3C5}",
        Rating::Good => "\u{1F44D}",
        Rating::Average => "\u{26A0}\u{FE0F}",
        Rating::Poor => "\u{2757}",
    }
}

/// Probability as a percentage with two decimals, e.g. `0.1234` -> `12.34%`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Presentation-ready copy of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentView {
    pub rating: String,
    pub rating_level: Rating,
    pub rating_class: &'static str,
    pub rating_icon: &'static str,
    pub probability: f64,
    pub probability_display: String,
    pub credit_score: i64,
}

impl AssessmentView {
    pub fn from_prediction(prediction: &PredictionResult) -> Self {
        let level = prediction.rating();
        Self {
            rating: prediction.rating_label().to_string(),
            rating_level: level,
            rating_class: rating_class(level),
            rating_icon: rating_icon(level),
            probability: prediction.probability(),
            probability_display: format_probability(prediction.probability()),
            credit_score: prediction.credit_score(),
        }
    }
}
